//! Error types for the expression engine.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Expression engine errors.
///
/// Lex and parse errors abort the current expression and render with a
/// `[line N]` tag; the remaining kinds are runtime errors and render
/// behind a `Runtime error:` prefix (see [`Error::report`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("[line {line}] Error: {message}")]
    Lex { line: usize, message: String },

    #[error("[line {line}] Error at '{lexeme}': {message}")]
    Parse {
        line: usize,
        lexeme: String,
        message: String,
    },

    #[error("undefined unit or constant '{0}'")]
    UndefinedVariable(String),

    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("invalid operands: {0}")]
    InvalidOperands(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("fractional exponent does not reduce to integer dimensions")]
    NonIntegerDim,

    #[error("out of memory")]
    OutOfMemory,
}

impl Error {
    /// True for lexical and syntactic errors.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Lex { .. } | Error::Parse { .. })
    }

    /// Render the error the way the CLI and the ABI print it.
    pub fn report(&self) -> String {
        if self.is_syntax() {
            self.to_string()
        } else {
            format!("Runtime error: {self}")
        }
    }
}

impl From<dim_units::Error> for Error {
    fn from(err: dim_units::Error) -> Self {
        match err {
            dim_units::Error::NonIntegerDim => Error::NonIntegerDim,
        }
    }
}
