use std::fmt;

use logos::Logos;

use crate::{ast::Position, error::LexError};

/// Raw tokens as recognised by the generated scanner.
///
/// Positions, end-of-file and the two-word `not in` operator are layered on top
/// by [`Lexer`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("not")]
    Not,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"'[^']*'")]
    Str,
    /// A quote with no closing partner before the end of input.
    #[regex(r"'[^']*")]
    UnterminatedStr,
    #[regex(r"//[^\n]*")]
    Comment,
    #[token("\n")]
    NewLine,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token("==")]
    EqualEqual,
    #[token("=")]
    Assign,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier, such as `x` or `regexMatch`.
    Name,
    /// Unsigned decimal integer literal.
    Int,
    /// Single-quoted string literal.
    Str,
    /// `true`
    True,
    /// `false`
    False,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `==`
    EqualEqual,
    /// `=`
    Assign,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `if`
    If,
    /// `else`
    Else,
    /// `for`
    For,
    /// `in`
    In,
    /// `not`
    Not,
    /// `not in`
    NotIn,
    /// `return`
    Return,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// A line break; terminates statements.
    NewLine,
    /// `// text`
    Comment,
    /// End of input, produced exactly once.
    Eof,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::True => Self::True,
            RawToken::False => Self::False,
            RawToken::If => Self::If,
            RawToken::Else => Self::Else,
            RawToken::For => Self::For,
            RawToken::In => Self::In,
            RawToken::Not => Self::Not,
            RawToken::Return => Self::Return,
            RawToken::Break => Self::Break,
            RawToken::Continue => Self::Continue,
            RawToken::Name => Self::Name,
            RawToken::Int => Self::Int,
            RawToken::Str | RawToken::UnterminatedStr => Self::Str,
            RawToken::Comment => Self::Comment,
            RawToken::NewLine => Self::NewLine,
            RawToken::Plus => Self::Plus,
            RawToken::Minus => Self::Minus,
            RawToken::Star => Self::Star,
            RawToken::Slash => Self::Slash,
            RawToken::Greater => Self::Greater,
            RawToken::GreaterEqual => Self::GreaterEqual,
            RawToken::Less => Self::Less,
            RawToken::LessEqual => Self::LessEqual,
            RawToken::EqualEqual => Self::EqualEqual,
            RawToken::Assign => Self::Assign,
            RawToken::Dot => Self::Dot,
            RawToken::Comma => Self::Comma,
            RawToken::LParen => Self::LParen,
            RawToken::RParen => Self::RParen,
            RawToken::LBrace => Self::LBrace,
            RawToken::RBrace => Self::RBrace,
            RawToken::LBracket => Self::LBracket,
            RawToken::RBracket => Self::RBracket,
        }
    }
}

/// A lexical token: its kind, its literal text and where it starts.
///
/// For strings `data` excludes the quotes, for comments it excludes the `//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind:     TokenKind,
    pub data:     String,
    pub position: Position,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::NewLine => write!(f, "new line"),
            TokenKind::Str => write!(f, "'{}'", self.data),
            TokenKind::Comment => write!(f, "//{}", self.data),
            _ => write!(f, "{}", self.data),
        }
    }
}

/// Turns a source buffer into a lazy stream of positioned tokens.
///
/// The lexer yields `Ok` tokens up to and including a single
/// [`TokenKind::Eof`], after which the iterator is exhausted. The first lexical
/// error is yielded as `Err` and also ends the stream. [`Lexer::reset`] rewinds
/// to the start of the buffer.
///
/// ## Example
/// ```
/// use quip::interpreter::lexer::{Lexer, TokenKind};
///
/// let kinds = Lexer::new("x = 1")
///     .map(|token| token.map(|token| token.kind))
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Name, TokenKind::Assign, TokenKind::Int, TokenKind::Eof]);
/// ```
#[derive(Clone)]
pub struct Lexer<'src> {
    source:     &'src str,
    inner:      logos::Lexer<'src, RawToken>,
    line:       usize,
    line_start: usize,
    finished:   bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source,
               inner: RawToken::lexer(source),
               line: 0,
               line_start: 0,
               finished: false }
    }

    /// Creates a lexer over raw bytes, which must be valid UTF-8.
    ///
    /// # Errors
    /// Returns [`LexError::InvalidUtf8`] positioned at the first invalid byte.
    pub fn from_bytes(bytes: &'src [u8]) -> Result<Self, LexError> {
        match std::str::from_utf8(bytes) {
            Ok(source) => Ok(Self::new(source)),
            Err(error) => {
                let valid = &bytes[..error.valid_up_to()];
                let line = valid.iter().filter(|&&b| b == b'\n').count();
                let line_start = valid.iter()
                                      .rposition(|&b| b == b'\n')
                                      .map_or(0, |i| i + 1);
                Err(LexError::InvalidUtf8 { position: Position::new(line,
                                                                    valid.len() - line_start,
                                                                    1), })
            },
        }
    }

    /// Returns the byte `k` positions ahead of the cursor without consuming it.
    ///
    /// `peek(1)` is the next unconsumed byte; `peek(0)` and reads past the end
    /// return `None`.
    #[must_use]
    pub fn peek(&self, k: usize) -> Option<u8> {
        k.checked_sub(1)
         .and_then(|offset| self.inner.remainder().as_bytes().get(offset).copied())
    }

    /// Advances the cursor by `k` bytes and returns the consumed slice.
    ///
    /// The count is clamped to the end of input and rounded up to the next
    /// character boundary. Line and column counters follow any consumed
    /// new-lines.
    pub fn consume(&mut self, k: usize) -> &'src str {
        let remainder = self.inner.remainder();
        let mut end = k.min(remainder.len());
        while !remainder.is_char_boundary(end) {
            end += 1;
        }

        let start = self.source.len() - remainder.len();
        self.inner.bump(end);
        self.advance_lines(start, &remainder[..end]);
        &remainder[..end]
    }

    /// Produces the next token.
    ///
    /// # Errors
    /// Returns a [`LexError`] when no token starts at the cursor or a string is
    /// never closed.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let Some(raw) = self.inner.next() else {
            self.finished = true;
            return Ok(Token { kind:     TokenKind::Eof,
                              data:     String::new(),
                              position: Position::new(self.line,
                                                      self.source.len() - self.line_start,
                                                      0), });
        };

        let span = self.inner.span();
        let slice = self.inner.slice();
        let position = Position::new(self.line, span.start - self.line_start, span.len());

        let raw = match raw {
            Ok(RawToken::UnterminatedStr) => {
                return Err(LexError::UnterminatedString { position });
            },
            Ok(raw) => raw,
            Err(()) => {
                return Err(LexError::UnrecognizedInput { text: slice.to_string(),
                                                         position });
            },
        };

        self.advance_lines(span.start, slice);

        if raw == RawToken::Not
           && let Some(token) = self.not_in(position)
        {
            return Ok(token);
        }

        let data = match raw {
            RawToken::Str => &slice[1..slice.len() - 1],
            RawToken::Comment => &slice[2..],
            _ => slice,
        };

        Ok(Token { kind: raw.into(),
                   data: data.to_string(),
                   position })
    }

    /// Rewinds to the start of the buffer.
    pub fn reset(&mut self) {
        *self = Self::new(self.source);
    }

    /// Merges a `not` at `position` with an immediately following `in`.
    fn not_in(&mut self, position: Position) -> Option<Token> {
        let mut lookahead = self.inner.clone();
        if lookahead.next() != Some(Ok(RawToken::In)) {
            return None;
        }

        let end = lookahead.span().end;
        self.inner = lookahead;
        Some(Token { kind:     TokenKind::NotIn,
                     data:     "not in".to_string(),
                     position: Position { length: end - (self.line_start + position.column),
                                          ..position }, })
    }

    fn advance_lines(&mut self, start: usize, text: &str) {
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                self.line += 1;
                self.line_start = start + offset + 1;
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if token.is_err() {
            self.finished = true;
        }
        Some(token)
    }
}

/// Tokenizes the whole of `source`, ending with [`TokenKind::Eof`].
///
/// # Errors
/// Returns the first [`LexError`] encountered.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}
