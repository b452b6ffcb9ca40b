use std::io::{self, Write};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Prints the arguments separated by spaces, without a trailing newline.
///
/// Strings print without quotes. Returns `nil`.
pub fn echo(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    write_line("echo", interpreter, args, "")
}

/// Like [`echo`], followed by a newline.
pub fn echoln(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    write_line("echoln", interpreter, args, "\n")
}

/// Space-joined display rendering of `args`.
///
/// # Example
/// ```
/// use quip::interpreter::{evaluator::function::print::render, value::core::Value};
///
/// let text = render(&[Value::from("total:"), Value::Int(3), Value::from(vec![Value::from("a")])]);
///
/// assert_eq!(text, "total: 3 ['a']");
/// ```
#[must_use]
pub fn render(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_line(name: &str,
              interpreter: &Interpreter,
              args: &[Value],
              terminator: &str)
              -> EvalResult<Value> {
    let mut stdout = io::stdout().lock();

    write!(stdout, "{}{terminator}", render(args)).and_then(|()| stdout.flush())
                                                   .map_err(|e| RuntimeError::Native { name:     name.to_string(),
                                                                                       details:  e.to_string(),
                                                                                       position: interpreter.call_site(), })?;

    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renders_strings_bare_at_the_top_level() {
        let map = Value::Map([("k".to_string(), Value::from("v"))].into());

        assert_eq!(render(&[Value::from("a b"), map]), "a b {k = 'v'}");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn echo_returns_nil() {
        let mut interpreter = Interpreter::new();

        assert_eq!(interpreter.run("return echoln('hello', 1)").unwrap(), Value::Nil);
    }
}
