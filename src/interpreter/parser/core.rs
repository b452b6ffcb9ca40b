use std::iter::Peekable;

use crate::{
    ast::{Comment, Expr, Program, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_membership,
            statement::parse_statement,
            utils::{peek_kind, unexpected},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence operator level, membership, and recursively descends
/// through the precedence hierarchy. Assignment is handled at statement level.
///
/// Grammar: `expression := membership`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_membership(tokens)
}

/// Parses a whole program up to `Eof`.
///
/// # Errors
/// Returns the first `ParseError` encountered.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a Token> + Clone
{
    let statements = parse_statements(tokens, TokenKind::Eof)?;

    Ok(Program { statements })
}

/// Parses statements, trivia included, until a token of kind `end` is next.
///
/// The terminating token is left in the stream. A statement must be followed
/// by a new-line, a comment or `end`, unless it ends in a closing brace.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the first statement.
/// - `end`: `RBrace` inside blocks, `Eof` at top level.
///
/// # Returns
/// The statements in source order.
pub(in crate::interpreter::parser) fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                                                               end: TokenKind)
                                                               -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    while let Some(&token) = tokens.peek() {
        match token.kind {
            kind if kind == end => break,
            TokenKind::Eof => break,
            TokenKind::NewLine => {
                tokens.next();
                statements.push(Statement::NewLine(token.position));
            },
            TokenKind::Comment => {
                tokens.next();
                statements.push(Statement::Comment(Comment { text:     token.data.clone(),
                                                             position: token.position, }));
            },
            _ => {
                let statement = parse_statement(tokens)?;
                let ends_with_block = matches!(statement,
                                               Statement::If(_)
                                               | Statement::For(_)
                                               | Statement::Function(_));
                statements.push(statement);

                match peek_kind(tokens) {
                    _ if ends_with_block => {},
                    TokenKind::NewLine | TokenKind::Comment => {},
                    kind if kind == end => {},
                    TokenKind::Eof => {},
                    _ => {
                        let expected = if end == TokenKind::RBrace {
                                           "a new line or '}'"
                                       } else {
                                           "a new line"
                                       };
                        return Err(tokens.peek()
                                         .map_or_else(|| unexpected(token, expected),
                                                      |next| unexpected(next, expected)));
                    },
                }
            },
        }
    }

    Ok(statements)
}
