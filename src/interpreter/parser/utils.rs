use std::iter::Peekable;

use crate::{
    ast::Variable,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Builds the error for a token that does not fit the grammar at this point.
///
/// Running into [`TokenKind::Eof`] is reported as
/// [`ParseError::UnexpectedEndOfInput`], anything else as
/// [`ParseError::UnexpectedToken`].
pub(in crate::interpreter::parser) fn unexpected(token: &Token, expected: &str) -> ParseError {
    if token.kind == TokenKind::Eof {
        ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                           position: token.position, }
    } else {
        ParseError::UnexpectedToken { token:    token.to_string(),
                                      expected: expected.to_string(),
                                      position: token.position, }
    }
}

/// Returns the next token, which the caller already knows exists.
///
/// The stream always ends in `Eof` and the parser stops there, so running dry
/// is reported against a default position rather than panicking.
pub(in crate::interpreter::parser) fn next_token<'a, I>(tokens: &mut Peekable<I>,
                                                         expected: &str)
                                                         -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next()
          .ok_or_else(|| ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                            position: Default::default(), })
}

/// Kind of the next token, treating an exhausted stream as end of input.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
}

/// Consumes a token of the given kind or fails.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the expected token.
/// - `kind`: The required token kind.
/// - `expected`: Description used in the error message.
///
/// # Returns
/// The consumed token.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                     kind: TokenKind,
                                                     expected: &str)
                                                     -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    let token = next_token(tokens, expected)?;
    if token.kind == kind {
        Ok(token)
    } else {
        Err(unexpected(token, expected))
    }
}

/// Skips new-line tokens; used where line breaks carry no meaning, such as
/// inside parentheses and brackets.
pub(in crate::interpreter::parser) fn skip_new_lines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while peek_kind(tokens) == TokenKind::NewLine {
        tokens.next();
    }
}

/// Parses a plain name into a [`Variable`].
///
/// # Errors
/// Returns a `ParseError` if the next token is not a name.
pub(in crate::interpreter::parser) fn parse_name<'a, I>(tokens: &mut Peekable<I>)
                                                         -> ParseResult<Variable>
    where I: Iterator<Item = &'a Token>
{
    let token = expect(tokens, TokenKind::Name, "a name")?;

    Ok(Variable { name:     token.data.clone(),
                  position: token.position, })
}

/// Parses a comma-separated list of items up to and including a closing token.
///
/// Shared by list literals, call arguments and parameter lists. New-lines
/// around items and separators are skipped. An immediately encountered closing
/// token produces an empty list.
///
/// Grammar (simplified): `list := (item ("," item)*)? closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned after the opening delimiter.
/// - `parse_item`: Function used to parse each element.
/// - `closing`: The token kind that ends the list.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse or a token other than `,`
/// or `closing` follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: TokenKind)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();

    skip_new_lines(tokens);
    if peek_kind(tokens) == closing {
        tokens.next();
        return Ok(items);
    }

    loop {
        skip_new_lines(tokens);
        items.push(parse_item(tokens)?);
        skip_new_lines(tokens);

        let token = next_token(tokens, "',' or a closing delimiter")?;
        match token.kind {
            TokenKind::Comma => {},
            kind if kind == closing => break,
            _ => return Err(unexpected(token, "',' or a closing delimiter")),
        }
    }

    Ok(items)
}
