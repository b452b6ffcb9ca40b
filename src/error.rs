/// Lexing and parsing errors.
///
/// Defines the errors raised while turning source bytes into tokens and tokens
/// into a [`Program`](crate::ast::Program). Parsing stops at the first error;
/// there is no recovery.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// undefined names, arity mismatches, unsupported operand types or division by
/// zero.
pub mod runtime_error;

pub use parse_error::{LexError, ParseError};
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// Any failure of a [`run`](crate::interpreter::evaluator::core::Interpreter::run)
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The source did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Self::Parse(ParseError::Lex(error))
    }
}
