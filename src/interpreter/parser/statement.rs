use std::iter::Peekable;

use crate::{
    ast::{
        Assign, Block, Expr, ForStatement, Function, IfStatement, Position, Return, Statement,
    },
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            unary::parse_parameter,
            utils::{
                expect, next_token, parse_comma_separated, parse_name, peek_kind, unexpected,
            },
        },
    },
    stack::ensure_sufficient_stack,
};

/// Parses a single non-trivia statement.
///
/// A statement may be one of:
/// - an `if` / `else if` / `else` chain.
/// - a `for` loop.
/// - `return`, `break` or `continue`.
/// - a function definition.
/// - an assignment to a name or a field.
/// - an expression used as a statement.
///
/// The terminating new-line is left in the stream.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the statement.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| dispatch_statement(tokens))
}

fn dispatch_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(&token) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { expected: "a statement".to_string(),
                                                      position: Position::default(), });
    };
    let position = token.position;

    match token.kind {
        TokenKind::If => {
            tokens.next();
            Ok(Statement::If(parse_if(tokens, position)?))
        },
        TokenKind::For => {
            tokens.next();
            Ok(Statement::For(parse_for(tokens, position)?))
        },
        TokenKind::Return => {
            tokens.next();
            let value = match peek_kind(tokens) {
                TokenKind::NewLine | TokenKind::Comment | TokenKind::RBrace | TokenKind::Eof => {
                    None
                },
                _ => Some(parse_expression(tokens)?),
            };
            Ok(Statement::Return(Return { value, position }))
        },
        TokenKind::Break => {
            tokens.next();
            Ok(Statement::Break(position))
        },
        TokenKind::Continue => {
            tokens.next();
            Ok(Statement::Continue(position))
        },
        _ => {
            if let Some(function) = parse_function_definition(tokens)? {
                return Ok(Statement::Function(function));
            }
            parse_assignment_or_expression(tokens)
        },
    }
}

/// Parses an `if` statement with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if <condition> { ... }
///     else if <condition> { ... }
///     else { ... }
/// ```
/// `else` must follow the closing brace on the same line. An `else if` is
/// stored as an else block holding the nested `if`.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `position`: Position of the `if` token.
///
/// # Errors
/// - `UnexpectedToken` if a branch body does not start with `{`, or `else` is
///   followed by anything but `if` or `{`.
/// - Propagates any errors from sub-expression parsing.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, position: Position) -> ParseResult<IfStatement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let condition = parse_expression(tokens)?;
    let body = parse_body(tokens)?;

    let else_body = if peek_kind(tokens) == TokenKind::Else {
        tokens.next();

        let token = next_token(tokens, "'if' or '{' after else")?;
        match token.kind {
            TokenKind::If => {
                let nested = parse_if(tokens, token.position)?;
                Some(Block { statements: vec![Statement::If(nested)],
                             position:   token.position, })
            },
            TokenKind::LBrace => Some(parse_block(tokens, token.position)?),
            _ => return Err(unexpected(token, "'if' or '{' after else")),
        }
    } else {
        None
    };

    Ok(IfStatement { condition,
                     body,
                     else_body,
                     position })
}

/// Parses a `for` loop.
///
/// Syntax:
/// ```text
///     for item in <iterable> { ... }
///     for index, item in <iterable> { ... }
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `for` keyword.
/// - `position`: Position of the `for` token.
pub fn parse_for<'a, I>(tokens: &mut Peekable<I>, position: Position) -> ParseResult<ForStatement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let first = parse_name(tokens)?;
    let (index, item) = if peek_kind(tokens) == TokenKind::Comma {
        tokens.next();
        (Some(first), parse_name(tokens)?)
    } else {
        (None, first)
    };

    expect(tokens, TokenKind::In, "'in'")?;
    let iterable = parse_expression(tokens)?;
    let body = parse_body(tokens)?;

    Ok(ForStatement { index,
                      item,
                      iterable,
                      body,
                      position })
}

/// Parses a function definition of the form `name(a, b) { ... }`.
///
/// A definition is recognised by lookahead:
/// 1. The next token is a name.
/// 2. It is immediately followed by `(`.
/// 3. A matching `)` exists.
/// 4. The token after the closing `)` is `{`.
///
/// If the input does not match, `Ok(None)` is returned and nothing is
/// consumed, so `f(x)` on its own line stays a call.
///
/// # Errors
/// Returns `InvalidParameter` if a parameter is not a bare name, and
/// propagates errors from the body.
fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Function>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut lookahead = tokens.clone();
    if lookahead.next().map(|token| token.kind) != Some(TokenKind::Name)
       || lookahead.next().map(|token| token.kind) != Some(TokenKind::LParen)
    {
        return Ok(None);
    }

    let mut parens = 1;
    while parens > 0 {
        match lookahead.next().map(|token| token.kind) {
            Some(TokenKind::LParen) => parens += 1,
            Some(TokenKind::RParen) => parens -= 1,
            Some(TokenKind::Eof) | None => return Ok(None),
            Some(_) => {},
        }
    }
    if peek_kind(&mut lookahead) != TokenKind::LBrace {
        return Ok(None);
    }

    let name = parse_name(tokens)?;
    expect(tokens, TokenKind::LParen, "'('")?;
    let parameters = parse_comma_separated(tokens, parse_parameter, TokenKind::RParen)?;
    let body = parse_body(tokens)?;

    Ok(Some(Function { name: name.name,
                       parameters,
                       body,
                       position: name.position }))
}

/// Parses `target = value`, or an expression statement when no `=` follows.
///
/// # Errors
/// Returns `InvalidAssignmentTarget` when the left side of `=` is not a name or
/// a field access.
fn parse_assignment_or_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let expr = parse_expression(tokens)?;

    if peek_kind(tokens) != TokenKind::Assign {
        return Ok(Statement::Expression(expr));
    }
    tokens.next();

    if !matches!(expr, Expr::Variable(_) | Expr::Field(_)) {
        return Err(ParseError::InvalidAssignmentTarget { target:   expr.to_string(),
                                                         position: expr.position(), });
    }

    let value = parse_expression(tokens)?;
    let position = expr.position();

    Ok(Statement::Assign(Assign { target: expr,
                                  value,
                                  position }))
}

/// Parses `{ ... }` as the body of a function, branch or loop.
fn parse_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a Token> + Clone
{
    let open = expect(tokens, TokenKind::LBrace, "'{'")?;

    parse_block(tokens, open.position)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{LiteralValue, Member},
        interpreter::parser::parse,
    };

    #[test]
    fn new_lines_and_comments_are_statements() {
        let program = parse("a = 1 // one\n\nb = 2").unwrap();

        let kinds: Vec<&str> = program.statements
                                      .iter()
                                      .map(|statement| match statement {
                                          Statement::Assign(_) => "assign",
                                          Statement::Comment(_) => "comment",
                                          Statement::NewLine(_) => "new-line",
                                          _ => "other",
                                      })
                                      .collect();

        assert_eq!(kinds, vec!["assign", "comment", "new-line", "new-line", "assign"]);
    }

    #[test]
    fn function_definition_versus_call() {
        let program = parse("add(a, b) {\n  return a + b\n}\nadd(1, 2)").unwrap();

        let function = program.functions().next().unwrap();
        assert_eq!(function.signature(), "add(a, b)");
        assert_eq!(function.position, Position::new(0, 0, 3));
        assert_eq!(function.body.end_position().line, 1);

        let call = program.calls().next().unwrap();
        assert_eq!(call.name, "add");
        assert_eq!(call.parameters.len(), 2);
    }

    #[test]
    fn else_if_nests_inside_else() {
        let program = parse("if a { x = 1 } else if b { x = 2 } else { x = 3 }").unwrap();

        let Statement::If(outer) = &program.statements[0] else {
            panic!("expected if");
        };
        let else_body = outer.else_body.as_ref().unwrap();
        let [Statement::If(inner)] = else_body.statements.as_slice() else {
            panic!("expected nested if");
        };
        assert!(inner.else_body.is_some());
    }

    #[test]
    fn for_with_and_without_index() {
        let program = parse("for i, v in xs {\n}\nfor v in xs {\n}").unwrap();
        let loops: Vec<&ForStatement> = program.statements
                                               .iter()
                                               .filter_map(|statement| match statement {
                                                   Statement::For(l) => Some(l),
                                                   _ => None,
                                               })
                                               .collect();

        assert_eq!(loops[0].index.as_ref().map(|v| v.name.as_str()), Some("i"));
        assert_eq!(loops[0].item.name, "v");
        assert_eq!(loops[1].index, None);
    }

    #[test]
    fn field_assignment_targets() {
        let program = parse("m['a'] = 1").unwrap();

        let Statement::Assign(assign) = &program.statements[0] else {
            panic!("expected assignment");
        };
        let Expr::Field(field) = &assign.target else {
            panic!("expected field target");
        };
        assert!(matches!(&field.member,
                         Member::Index(index) if matches!(index.as_ref(),
                                                          Expr::Literal(l) if l.value == LiteralValue::Str("a".to_string()))));
    }

    #[test]
    fn bare_return() {
        let program = parse("f() {\n  return\n}").unwrap();
        let function = program.functions().next().unwrap();

        assert!(function.body
                        .statements
                        .iter()
                        .any(|s| matches!(s, Statement::Return(Return { value: None, .. }))));
    }

    #[test]
    fn block_statements_need_no_separator() {
        let program = parse("f(n){ if n<1 { return n } return f(n-1) }").unwrap();
        let function = program.functions().next().unwrap();

        assert!(matches!(function.body.statements.as_slice(),
                         [Statement::If(_), Statement::Return(_)]));
    }

    #[test]
    fn errors() {
        assert!(matches!(parse("1 + 2 = 3"),
                         Err(ParseError::InvalidAssignmentTarget { .. })));
        assert!(matches!(parse("f(1) {\n}"), Err(ParseError::InvalidParameter { .. })));
        assert!(matches!(parse("if a {\n  b = 1\n"),
                         Err(ParseError::UnterminatedBlock { position }) if position == Position::new(0, 5, 1)));
        assert!(matches!(parse("a = 1 b = 2"), Err(ParseError::UnexpectedToken { .. })));
        assert!(matches!(parse("a = 99999999999999999999"),
                         Err(ParseError::LiteralTooLarge { .. })));
        assert!(matches!(parse("a = ("), Err(ParseError::UnexpectedEndOfInput { .. })));
        assert!(matches!(parse("if a { }\nelse { }"), Err(ParseError::UnexpectedToken { .. })));
    }
}
