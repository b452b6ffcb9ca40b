use thiserror::Error;

use crate::ast::Position;

/// Errors raised while tokenizing source bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No token starts at this byte.
    #[error("Error at {position}: Unrecognized input '{text}'.")]
    UnrecognizedInput {
        /// The offending text.
        text:     String,
        /// Where the input starts.
        position: Position,
    },
    /// A string literal reached the end of input without its closing quote.
    #[error("Error at {position}: Unterminated string literal.")]
    UnterminatedString {
        /// Where the opening quote is.
        position: Position,
    },
    /// The source buffer is not valid UTF-8.
    #[error("Error at {position}: Source is not valid UTF-8.")]
    InvalidUtf8 {
        /// Location of the first invalid byte.
        position: Position,
    },
}

impl LexError {
    /// The position the error refers to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnrecognizedInput { position, .. }
            | Self::UnterminatedString { position }
            | Self::InvalidUtf8 { position } => *position,
        }
    }
}

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The lexer failed.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Found a token that cannot appear here.
    #[error("Error at {position}: Unexpected token '{token}', expected {expected}.")]
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// What the parser was looking for.
        expected: String,
        /// Where the token starts.
        position: Position,
    },
    /// Reached the end of input in the middle of a construct.
    #[error("Error at {position}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// Location of the end-of-file token.
        position: Position,
    },
    /// A `{` was never closed.
    #[error("Error at {position}: Block is never closed.")]
    UnterminatedBlock {
        /// Location of the opening brace.
        position: Position,
    },
    /// The left side of `=` is neither a name nor a field.
    #[error("Error at {position}: Cannot assign to '{target}'.")]
    InvalidAssignmentTarget {
        /// Rendering of the rejected target.
        target:   String,
        /// Where the target starts.
        position: Position,
    },
    /// A function parameter is not a bare name.
    #[error("Error at {position}: Invalid parameter '{parameter}', parameters must be names.")]
    InvalidParameter {
        /// Rendering of the rejected parameter.
        parameter: String,
        /// Where the parameter starts.
        position:  Position,
    },
    /// An integer literal does not fit in 64 bits.
    #[error("Error at {position}: Integer literal '{literal}' is too large.")]
    LiteralTooLarge {
        /// The literal text.
        literal:  String,
        /// Location of the literal.
        position: Position,
    },
}

impl ParseError {
    /// The position the error refers to.
    ///
    /// ## Example
    /// ```
    /// use quip::parse;
    ///
    /// let error = parse("a = \nb = 2").unwrap_err();
    ///
    /// assert_eq!(error.position().line, 0);
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Lex(error) => error.position(),
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::UnterminatedBlock { position }
            | Self::InvalidAssignmentTarget { position, .. }
            | Self::InvalidParameter { position, .. }
            | Self::LiteralTooLarge { position, .. } => *position,
        }
    }

    /// The error description without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        let rendered = self.to_string();
        rendered.split_once(": ")
                .map_or_else(|| rendered.clone(), |(_, message)| message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn message_strips_location() {
        let error = ParseError::UnterminatedBlock { position: Position::new(3, 1, 1) };

        assert_eq!(error.to_string(), "Error at 4:2: Block is never closed.");
        assert_eq!(error.message(), "Block is never closed.");
    }

    #[test]
    fn lex_errors_keep_their_position() {
        let position = Position::new(0, 7, 1);
        let error = ParseError::from(LexError::UnterminatedString { position });

        assert_eq!(error.position(), position);
    }
}
