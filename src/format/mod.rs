//! Input formats: the tree describing what is read, and the declarations derived from it.

pub use ast::*;
pub use items::list_used_items;
pub use load::{load_format, parse_format};

pub mod ast;
pub mod items;
pub mod load;

mod kw;
mod sess;
mod syntax;
