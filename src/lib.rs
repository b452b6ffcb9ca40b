//! # quip
//!
//! quip is a small dynamically-typed scripting language written in Rust.
//! Source text is tokenized, parsed into a positioned syntax tree and run by a
//! tree-walking interpreter with lexical scopes, user functions and a registry
//! of native functions.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::error;

/// Defines the syntax tree.
///
/// Every node carries the [`Position`](ast::Position) of the token that
/// introduced it. Trees render back to source that parses to the same tree.
pub mod ast;
/// Interpreter settings.
pub mod config;
/// Error types for lexing, parsing and evaluation.
///
/// Every error that refers to source code carries a position and renders as
/// `Error at line:column: message`.
pub mod error;
/// The lexer, parser, evaluator and runtime values.
pub mod interpreter;
/// Stack growth for the recursive parser and evaluator.
pub mod stack;

pub use config::Config;
pub use error::Error;
pub use interpreter::{
    evaluator::core::Interpreter,
    parser::{Parser, parse},
    value::core::Value,
};

/// Parses and runs a script on a fresh interpreter.
///
/// Parse errors always propagate. A runtime error propagates when the
/// interpreter is in debug mode (see [`Interpreter::is_debug`]); otherwise it
/// is logged and the result is `nil`.
///
/// # Errors
/// Returns the parse error, or the runtime error in debug mode.
///
/// # Examples
/// ```
/// use quip::{Config, Value, run_script};
///
/// let config = Config::default();
///
/// assert_eq!(run_script("return 2 + 2", &config).unwrap(), Value::Int(4));
///
/// // Runtime failures are reported, not returned, outside debug mode.
/// assert_eq!(run_script("return x + 1", &config).unwrap(), Value::Nil);
/// assert!(run_script("return x + 1", &config.with_debug(true)).is_err());
///
/// // Parse failures always surface.
/// assert!(run_script("return (1", &config).is_err());
/// ```
pub fn run_script(source: &str, config: &Config) -> Result<Value, Error> {
    let program = parse(source)?;
    let mut interpreter = Interpreter::with_config(*config);

    match interpreter.run(&program) {
        Err(Error::Runtime(e)) if !interpreter.is_debug() => {
            error!("{e}");
            Ok(Value::Nil)
        },
        result => result,
    }
}
