use std::iter::Peekable;

use crate::{
    ast::{BinaryExpression, BinaryOperator, Expr},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses membership tests, the lowest binary precedence level.
///
/// Grammar: `membership := equality (("in" | "not in") equality)*`
///
/// # Parameters
/// - `tokens`: Token stream.
///
/// # Returns
/// A left-associative `Expr::Binary` tree, or the operand alone.
pub fn parse_membership<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           parse_equality,
                           &[BinaryOperator::In, BinaryOperator::NotIn])
}

/// Parses equality comparisons.
///
/// Grammar: `equality := relational ("==" relational)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, parse_relational, &[BinaryOperator::Equal])
}

/// Parses ordering comparisons.
///
/// Grammar: `relational := additive ((">" | ">=" | "<" | "<=") additive)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           parse_additive,
                           &[BinaryOperator::Greater,
                             BinaryOperator::GreaterEqual,
                             BinaryOperator::Less,
                             BinaryOperator::LessEqual])
}

/// Parses addition and subtraction expressions.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           parse_multiplicative,
                           &[BinaryOperator::Add, BinaryOperator::Sub])
}

/// Parses multiplication and division expressions.
///
/// Grammar: `multiplicative := unary (("*" | "/") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           parse_unary,
                           &[BinaryOperator::Mul, BinaryOperator::Div])
}

/// Folds `operand (op operand)*` into a left-leaning tree for the operators in
/// `accepted`.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operand: fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 accepted: &[BinaryOperator])
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = operand(tokens)?;

    while let Some(token) = tokens.peek()
          && let Some(operator) = token_to_binary_operator(token.kind)
          && accepted.contains(&operator)
    {
        let position = token.position;
        tokens.next();

        let right = operand(tokens)?;
        left = Expr::Binary(BinaryExpression { left: Box::new(left),
                                               operator,
                                               right: Box::new(right),
                                               position });
    }

    Ok(left)
}

/// Maps a token kind to its corresponding binary operator.
///
/// # Example
/// ```
/// use quip::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(TokenKind::NotIn),
///            Some(BinaryOperator::NotIn));
/// assert_eq!(token_to_binary_operator(TokenKind::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::In => Some(BinaryOperator::In),
        TokenKind::NotIn => Some(BinaryOperator::NotIn),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{ast::Statement, interpreter::parser::parse};

    fn render(source: &str) -> String {
        let program = parse(source).unwrap();
        match &program.statements[0] {
            Statement::Expression(expr) => expr.to_string(),
            other => panic!("expected an expression, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(render("1 + 2 * 3"), "1 + (2 * 3)");
        assert_eq!(render("(1 + 2) * 3"), "(1 + 2) * 3");
    }

    #[test]
    fn operators_are_left_associative() {
        assert_eq!(render("8 - 4 - 2"), "(8 - 4) - 2");
        assert_eq!(render("8 / 4 / 2"), "(8 / 4) / 2");
    }

    #[test]
    fn membership_binds_loosest() {
        assert_eq!(render("1 + 1 in [2]"), "(1 + 1) in [2]");
        assert_eq!(render("a == b not in c"), "(a == b) not in c");
        assert_eq!(render("a > b == c < d"), "(a > b) == (c < d)");
    }
}
