/// Binary operator parsing.
///
/// One function per precedence level, from membership down to
/// multiplication, all folding left-associatively.
pub mod binary;
/// Block parsing.
///
/// Parses brace-delimited statement sequences used as bodies and as mapping
/// literals.
pub mod block;
/// Parser entry points and shared result type.
pub mod core;
/// Statement parsing.
///
/// Dispatches on the leading token to conditionals, loops, function
/// definitions, assignments and expression statements.
pub mod statement;
/// Unary, postfix and primary expression parsing.
pub mod unary;
/// Helpers shared by the parsing functions.
pub mod utils;

use crate::{
    ast::Program,
    interpreter::{
        lexer::{Lexer, Token, tokenize},
        parser::core::{ParseResult, parse_program},
    },
};

/// A tokenized source unit, ready to be parsed.
///
/// The token list stays available after parsing for tooling that maps cursor
/// positions back to tokens.
///
/// ## Example
/// ```
/// use quip::interpreter::parser::Parser;
///
/// let parser = Parser::new("x = 1\ny = x").unwrap();
/// let program = parser.parse().unwrap();
///
/// assert_eq!(parser.tokens().len(), 8);
/// assert_eq!(program.to_string(), "x = 1\ny = x");
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    /// Tokenizes `source`.
    ///
    /// # Errors
    /// Returns a lexing failure wrapped in a `ParseError`.
    pub fn new(source: &str) -> ParseResult<Self> {
        Ok(Self { tokens: tokenize(source)? })
    }

    /// Tokenizes raw bytes, which must be valid UTF-8.
    ///
    /// # Errors
    /// Returns a lexing failure wrapped in a `ParseError`.
    pub fn from_bytes(bytes: &[u8]) -> ParseResult<Self> {
        let tokens = Lexer::from_bytes(bytes)?.collect::<Result<_, _>>()?;

        Ok(Self { tokens })
    }

    /// The full token list, ending with `Eof`.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Builds the [`Program`].
    ///
    /// # Errors
    /// Returns the first structurally invalid construct as a `ParseError`.
    pub fn parse(&self) -> ParseResult<Program> {
        parse_program(&mut self.tokens.iter().peekable())
    }
}

/// Tokenizes and parses `source` in one step.
///
/// # Errors
/// Returns the first lexing or parsing error.
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source)?.parse()
}
