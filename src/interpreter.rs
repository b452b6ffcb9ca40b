/// The evaluator walks the syntax tree and computes results.
///
/// It owns the scope stack and the native registry, executes statements and
/// expressions, and reports runtime errors with the position of the node
/// that caused them.
pub mod evaluator;
/// The lexer turns source text into positioned tokens.
///
/// Whitespace other than newlines is skipped; newlines and comments are kept
/// as tokens because the parser needs them as statement separators and
/// documentation. The stream ends with a single end-of-input token.
pub mod lexer;
/// The parser builds a [`Program`](crate::ast::Program) from tokens.
///
/// A recursive-descent parser with one function per precedence level. The
/// first error aborts parsing.
pub mod parser;
/// Runtime values and native function handles.
pub mod value;
