use std::iter::Peekable;

use crate::{
    ast::{
        BinaryExpression, BinaryOperator, Expr, Field, FunctionCall, List, Literal, LiteralValue,
        Member, Position, Variable,
    },
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{
                expect, next_token, parse_comma_separated, parse_name, peek_kind,
                skip_new_lines, unexpected,
            },
        },
    },
    stack::ensure_sufficient_stack,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (integer negation)
/// - `not` (boolean negation)
///
/// Neither has its own AST node. `-x` becomes `0 - x` and `not x` becomes
/// `x == false`, so evaluation and rendering need no extra cases.
///
/// Grammar:
/// ```text
///     unary := ("-" | "not") unary
///            | primary postfix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| -> ParseResult<Expr> {
        match tokens.peek() {
            Some(token) if token.kind == TokenKind::Minus => {
                let position = token.position;
                tokens.next();
                let operand = parse_unary(tokens)?;

                Ok(Expr::Binary(BinaryExpression { left: Box::new(literal(LiteralValue::Int(0),
                                                                          position)),
                                                   operator: BinaryOperator::Sub,
                                                   right: Box::new(operand),
                                                   position }))
            },
            Some(token) if token.kind == TokenKind::Not => {
                let position = token.position;
                tokens.next();
                let operand = parse_unary(tokens)?;

                Ok(Expr::Binary(BinaryExpression { left: Box::new(operand),
                                                   operator: BinaryOperator::Equal,
                                                   right: Box::new(literal(LiteralValue::Bool(false),
                                                                           position)),
                                                   position }))
            },
            _ => {
                let primary = parse_primary(tokens)?;
                parse_postfix(tokens, primary)
            },
        }
    })
}

/// Parses a primary (atomic) expression.
///
/// Grammar (simplified):
/// ```text
///     primary := INT | STRING | "true" | "false"
///              | NAME | NAME "(" arguments ")"
///              | "(" expression ")"
///              | "[" elements "]"
///              | "{" statements "}"
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = next_token(tokens, "an expression")?;
    let position = token.position;

    match token.kind {
        TokenKind::Int => {
            let value = token.data
                             .parse()
                             .map_err(|_| ParseError::LiteralTooLarge { literal: token.data
                                                                                      .clone(),
                                                                        position })?;
            Ok(literal(LiteralValue::Int(value), position))
        },
        TokenKind::Str => Ok(literal(LiteralValue::Str(token.data.clone()), position)),
        TokenKind::True => Ok(literal(LiteralValue::Bool(true), position)),
        TokenKind::False => Ok(literal(LiteralValue::Bool(false), position)),
        TokenKind::Name => {
            if peek_kind(tokens) == TokenKind::LParen {
                Ok(Expr::Call(parse_call(tokens, token)?))
            } else {
                Ok(Expr::Variable(Variable { name: token.data.clone(),
                                             position }))
            }
        },
        TokenKind::LParen => {
            skip_new_lines(tokens);
            let expr = parse_expression(tokens)?;
            skip_new_lines(tokens);
            expect(tokens, TokenKind::RParen, "')'")?;
            Ok(expr)
        },
        TokenKind::LBracket => {
            let values = parse_comma_separated(tokens, parse_expression, TokenKind::RBracket)?;
            Ok(Expr::List(List { values, position }))
        },
        TokenKind::LBrace => Ok(Expr::Block(parse_block(tokens, position)?)),
        _ => Err(unexpected(token, "an expression")),
    }
}

/// Parses the argument list of a call whose name token was just consumed.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at `(`.
/// - `name`: The callee name token.
pub(in crate::interpreter::parser) fn parse_call<'a, I>(tokens: &mut Peekable<I>,
                                                         name: &Token)
                                                         -> ParseResult<FunctionCall>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::LParen, "'('")?;
    let parameters = parse_comma_separated(tokens, parse_expression, TokenKind::RParen)?;

    Ok(FunctionCall { name: name.data.clone(),
                      parameters,
                      position: name.position })
}

/// Parses member accesses chained onto an expression.
///
/// Handles:
/// 1. **Named members** `expr.name`
/// 2. **Method-style calls** `expr.name(args)`
/// 3. **Indexing** `expr[key]`
///
/// Accesses chain left to right, so `a.b[0].c` reads `c` from the element at
/// `0` of `a.b`.
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "." NAME ["(" arguments ")"]
///              | postfix "[" expression "]"
/// ```
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    loop {
        let member = match peek_kind(tokens) {
            TokenKind::Dot => {
                tokens.next();
                let name = expect(tokens, TokenKind::Name, "a member name")?;
                if peek_kind(tokens) == TokenKind::LParen {
                    Member::Call(parse_call(tokens, name)?)
                } else {
                    Member::Name(Variable { name:     name.data.clone(),
                                            position: name.position, })
                }
            },
            TokenKind::LBracket => {
                tokens.next();
                skip_new_lines(tokens);
                let index = parse_expression(tokens)?;
                skip_new_lines(tokens);
                expect(tokens, TokenKind::RBracket, "']'")?;
                Member::Index(Box::new(index))
            },
            _ => break,
        };

        let position = node.position();
        node = Expr::Field(Field { object: Box::new(node),
                                   member,
                                   position });
    }

    Ok(node)
}

fn literal(value: LiteralValue, position: Position) -> Expr {
    Expr::Literal(Literal { value, position })
}

/// Parses a bare parameter name, rejecting anything else.
pub(in crate::interpreter::parser) fn parse_parameter<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<Variable>
    where I: Iterator<Item = &'a Token> + Clone
{
    match tokens.peek() {
        Some(token) if token.kind == TokenKind::Name => parse_name(tokens),
        Some(token) if token.kind != TokenKind::Eof => {
            Err(ParseError::InvalidParameter { parameter: token.to_string(),
                                               position:  token.position, })
        },
        _ => parse_name(tokens),
    }
}
