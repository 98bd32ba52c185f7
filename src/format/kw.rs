//! Custom keywords of the format description language.

syn::custom_keyword!(read);
syn::custom_keyword!(upto);
