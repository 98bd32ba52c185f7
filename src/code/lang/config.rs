//! Configuration of the C++ emitter.
//!
//! The configuration is plain data passed to each call, so independent generations
//! can run concurrently with different settings.

use std::fmt;
use std::sync::Arc;

/// Produces a loop header from the counter name and the bound, e.g. `rep(i, N)`.
pub type LoopFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Produces a whole statement from the list of expressions it reads or writes.
pub type StmtFn = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// How to emit one kind of statement.
#[derive(Clone)]
pub enum Strategy<F> {
    Default,
    /// A named alternative, validated when the emitter is built.
    Named(String),
    Custom(F),
}

impl<F> Default for Strategy<F> {
    fn default() -> Self {
        Strategy::Default
    }
}

impl<F> fmt::Debug for Strategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Default => f.write_str("Default"),
            Strategy::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Strategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Type of every scalar read from the input. Both are fixed-width signed integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarTy {
    Int,
    Int64,
}

impl Default for ScalarTy {
    fn default() -> Self {
        ScalarTy::Int
    }
}

impl ScalarTy {
    pub fn name(self) -> &'static str {
        match self {
            ScalarTy::Int => "int",
            ScalarTy::Int64 => "int64_t",
        }
    }

    /// Conversion specifier for `scanf` and `printf`.
    pub fn format_spec(self) -> &'static str {
        match self {
            ScalarTy::Int => "%d",
            ScalarTy::Int64 => "%lld",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Default: `for (int i = 0; i < N; ++i)`. Named: a macro invoked as `NAME (i, N)`.
    pub loop_construct: Strategy<LoopFn>,
    /// Default: `scanf`. Named: `scanf`, `cin` or `std::cin`.
    pub scanner: Strategy<StmtFn>,
    /// Default: `printf`. Named: `printf`, `cout` or `std::cout`.
    pub printer: Strategy<StmtFn>,
    /// If unset, library names are qualified with `std::`.
    pub using_namespace_std: bool,
    pub indent: String,
    pub scalar: ScalarTy,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            loop_construct: Strategy::Default,
            scanner: Strategy::Default,
            printer: Strategy::Default,
            using_namespace_std: true,
            indent: " ".repeat(4),
            scalar: ScalarTy::Int,
        }
    }
}

impl EmitConfig {
    pub fn with_rep_macro(mut self, name: &str) -> Self {
        self.loop_construct = Strategy::Named(name.to_string());
        self
    }

    pub fn with_loop_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.loop_construct = Strategy::Custom(Arc::new(f));
        self
    }

    pub fn with_scanner(mut self, name: &str) -> Self {
        self.scanner = Strategy::Named(name.to_string());
        self
    }

    pub fn with_scanner_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.scanner = Strategy::Custom(Arc::new(f));
        self
    }

    pub fn with_printer(mut self, name: &str) -> Self {
        self.printer = Strategy::Named(name.to_string());
        self
    }

    pub fn with_printer_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.printer = Strategy::Custom(Arc::new(f));
        self
    }

    pub fn with_qualified_std(mut self) -> Self {
        self.using_namespace_std = false;
        self
    }

    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    pub fn with_scalar(mut self, scalar: ScalarTy) -> Self {
        self.scalar = scalar;
        self
    }

    /// Prefix of names from the standard library.
    pub fn std_prefix(&self) -> &'static str {
        if self.using_namespace_std {
            ""
        } else {
            "std::"
        }
    }
}
