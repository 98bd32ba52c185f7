//! Syntax tree of a format description, obtained by parsing with `syn`.
//!
//! A description is a sequence of statements, e.g.:
//!
//! ```text
//! read N, K;
//! for i upto N {
//!     read A[i + 1], B[i];
//! }
//! ```

use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::Error;

use super::kw;

/// A format description file as a whole.
pub struct AFormat {
    pub stmts: Vec<AStmt>,
}

pub enum AStmt {
    /// E.g., `read N, A[i];`: reads the items, then a line break.
    Read {
        kw: kw::read,
        items: Punctuated<AItem, syn::Token![,]>,
        semi: syn::Token![;],
    },
    /// E.g., `for i upto N { [...] }`.
    For {
        kw: syn::Token![for],
        index: syn::Ident,
        upto: kw::upto,
        bound: syn::Expr,
        body_brace: syn::token::Brace,
        body: Vec<AStmt>,
    },
}

/// E.g., `N` or `A[i + 1][j]`.
pub struct AItem {
    pub name: syn::Ident,
    pub indices: Vec<(syn::token::Bracket, syn::Expr)>,
}

fn parse_stmts(input: ParseStream) -> Result<Vec<AStmt>, Error> {
    let mut stmts = vec![];
    while !input.is_empty() {
        stmts.push(input.parse()?);
    }
    Ok(stmts)
}

impl Parse for AFormat {
    fn parse(input: ParseStream) -> Result<Self, Error> {
        Ok(AFormat {
            stmts: parse_stmts(input)?,
        })
    }
}

impl Parse for AStmt {
    fn parse(input: ParseStream) -> Result<Self, Error> {
        let lookahead = input.lookahead1();
        if lookahead.peek(kw::read) {
            Ok(AStmt::Read {
                kw: input.parse()?,
                items: Punctuated::parse_separated_nonempty(input)?,
                semi: input.parse()?,
            })
        } else if lookahead.peek(syn::Token![for]) {
            let body_input;
            Ok(AStmt::For {
                kw: input.parse()?,
                index: input.call(syn::Ident::parse_any)?,
                upto: input.parse()?,
                bound: input.call(syn::Expr::parse_without_eager_brace)?,
                body_brace: syn::braced!(body_input in input),
                body: parse_stmts(&body_input)?,
            })
        } else {
            Err(lookahead.error())
        }
    }
}

impl Parse for AItem {
    fn parse(input: ParseStream) -> Result<Self, Error> {
        // Any identifier is a valid variable name, including Rust keywords.
        let name = input.call(syn::Ident::parse_any)?;
        let mut indices = vec![];
        while input.peek(syn::token::Bracket) {
            let index_input;
            let bracket = syn::bracketed!(index_input in input);
            indices.push((bracket, index_input.parse()?));
        }
        Ok(AItem { name, indices })
    }
}
