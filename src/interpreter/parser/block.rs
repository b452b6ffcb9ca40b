use std::iter::Peekable;

use crate::{
    ast::{Block, Position},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, core::parse_statements, utils::peek_kind},
    },
};

/// Parses a block delimited by braces.
///
/// A block consists of zero or more statements separated by new-lines.
/// New-lines and comments inside the block are kept as statements. The same
/// node serves as a function or loop body and as a mapping literal.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening brace.
/// - `position`: Position of the opening brace.
///
/// # Returns
/// The parsed [`Block`].
///
/// # Errors
/// - `UnterminatedBlock` if input ends before the closing `}`.
/// - Propagates any error from the statements inside.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, position: Position) -> ParseResult<Block>
    where I: Iterator<Item = &'a Token> + Clone
{
    let statements = parse_statements(tokens, TokenKind::RBrace)?;

    if peek_kind(tokens) != TokenKind::RBrace {
        return Err(ParseError::UnterminatedBlock { position });
    }
    tokens.next();

    Ok(Block { statements, position })
}
