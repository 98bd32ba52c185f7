//! Generates C++ code reading the input of a competitive programming problem.
//!
//! The input format is lowered in three steps:
//! a code tree is built by declaring each variable just before it is first needed,
//! the tree is optimized by merging adjacent statements,
//! and finally it is emitted as indented C++ lines.

pub mod code;
pub mod error;
pub mod expr;
pub mod format;
pub mod render;

pub use code::lang::config::{EmitConfig, ScalarTy, Strategy};
pub use error::{Error, Result};
pub use render::*;
