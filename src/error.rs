//! Errors raised while lowering a format into code.
//!
//! Generation is all-or-nothing: every public operation either returns the full text
//! or one of these errors, never a partial result.

use std::error::Error as StdError;
use std::fmt;

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Scheduling(SchedulingError),
    Configuration(ConfigurationError),
    Expr(ExprError),
    Format(FormatError),
    /// Writing generated tokens into a string failed.
    Fmt(fmt::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An item was reached before its declaration could be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    /// The format reads a variable which is not declared at that point,
    /// either because it is missing or because its dependencies form a cycle.
    Undeclared { name: String },
    /// The variable is in scope, but only as a loop counter, so there is nothing to read into.
    NotInTable { name: String },
}

/// A named strategy in the emitter configuration is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    UnknownScanner { name: String },
    UnknownPrinter { name: String },
    InvalidLoopMacro { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    Parse { expr: String, message: String },
    Overflow { expr: String },
    DivisionByZero { expr: String },
    /// A subscript is not of the form `var + offset` for an enclosing loop variable.
    UnsupportedIndex { name: String, index: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    DimsBasesMismatch {
        name: String,
        dims: usize,
        bases: usize,
    },
    DuplicateDecl {
        name: String,
    },
    Io {
        path: String,
        message: String,
    },
    /// Parse error, already rendered against the source text.
    Parse {
        rendered: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Scheduling(e) => fmt::Display::fmt(e, f),
            Error::Configuration(e) => fmt::Display::fmt(e, f),
            Error::Expr(e) => fmt::Display::fmt(e, f),
            Error::Format(e) => fmt::Display::fmt(e, f),
            Error::Fmt(_) => write!(f, "cannot write generated code"),
        }
    }
}

impl fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingError::Undeclared { name } => {
                write!(f, "variable `{}` is not declared yet", name)
            }
            SchedulingError::NotInTable { name } => {
                write!(f, "`{}` is a loop counter and cannot be read", name)
            }
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownScanner { name } => {
                write!(f, "unknown scanner `{}`, expected `scanf` or `cin`", name)
            }
            ConfigurationError::UnknownPrinter { name } => {
                write!(f, "unknown printer `{}`, expected `printf` or `cout`", name)
            }
            ConfigurationError::InvalidLoopMacro { name } => {
                write!(f, "`{}` is not a valid macro name", name)
            }
        }
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Parse { expr, message } => {
                write!(f, "cannot parse expression `{}`: {}", expr, message)
            }
            ExprError::Overflow { expr } => write!(f, "integer overflow in `{}`", expr),
            ExprError::DivisionByZero { expr } => write!(f, "division by zero in `{}`", expr),
            ExprError::UnsupportedIndex { name, index } => write!(
                f,
                "index `{}` of `{}` must be an enclosing loop variable plus an offset",
                index, name
            ),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::DimsBasesMismatch { name, dims, bases } => write!(
                f,
                "declaration of `{}` has {} dimensions but {} bases",
                name, dims, bases
            ),
            FormatError::DuplicateDecl { name } => {
                write!(f, "variable `{}` declared twice", name)
            }
            FormatError::Io { path, message } => write!(f, "cannot read `{}`: {}", path, message),
            FormatError::Parse { rendered } => f.write_str(rendered),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Scheduling(e) => Some(e),
            Error::Configuration(e) => Some(e),
            Error::Expr(e) => Some(e),
            Error::Format(e) => Some(e),
            Error::Fmt(e) => Some(e),
        }
    }
}

impl StdError for SchedulingError {}
impl StdError for ConfigurationError {}
impl StdError for ExprError {}
impl StdError for FormatError {}

impl From<SchedulingError> for Error {
    fn from(e: SchedulingError) -> Self {
        Error::Scheduling(e)
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Configuration(e)
    }
}

impl From<ExprError> for Error {
    fn from(e: ExprError) -> Self {
        Error::Expr(e)
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Error::Format(e)
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error::Fmt(e)
    }
}
