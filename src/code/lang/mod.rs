//! Target language emission. Only C++ is supported.

pub mod config;
pub mod cpp;
pub mod ty;
