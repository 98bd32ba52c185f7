//! Lowering of formats into code: build a code tree, optimize it, emit it.

pub mod build;
pub mod indent;
pub mod lang;
pub mod peephole;
pub mod tree;
