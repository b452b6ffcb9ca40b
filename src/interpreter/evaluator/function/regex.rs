use regex::Regex;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::builtin::expect_args,
        },
        value::core::Value,
    },
};

/// `regexMatch(pattern, text)`: whether `pattern` matches anywhere in `text`.
///
/// # Example
/// ```
/// use quip::interpreter::{
///     evaluator::{core::Interpreter, function::regex::regex_match},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// let args = [Value::from("^ab+c$"), Value::from("abbbc")];
///
/// assert_eq!(regex_match(&mut interpreter, &args).unwrap(), Value::Bool(true));
/// ```
pub fn regex_match(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [pattern, text] = expect_args::<2>("regexMatch", interpreter, args)?;
    let position = interpreter.call_site();

    let pattern = compile("regexMatch", pattern.as_str("regexMatch", position)?, interpreter)?;
    Ok(Value::Bool(pattern.is_match(text.as_str("regexMatch", position)?)))
}

/// `regexMapMatch(map, text)`: whether any key of `map`, read as a pattern,
/// matches `text`.
pub fn regex_map_match(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Bool(first_match("regexMapMatch", interpreter, args)?.is_some()))
}

/// `regexMapValue(map, text)`: the value under the first key, in key order,
/// whose pattern matches `text`, or `nil`.
pub fn regex_map_value(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    Ok(first_match("regexMapValue", interpreter, args)?.cloned()
                                                       .unwrap_or_default())
}

fn first_match<'a>(name: &str,
                   interpreter: &Interpreter,
                   args: &'a [Value])
                   -> EvalResult<Option<&'a Value>> {
    let [map, text] = expect_args::<2>(name, interpreter, args)?;
    let position = interpreter.call_site();

    let Value::Map(entries) = map else {
        return Err(RuntimeError::Type { operation: name.to_string(),
                                        operands:  format!("{} and {}",
                                                           map.type_name(),
                                                           text.type_name()),
                                        position });
    };
    let text = text.as_str(name, position)?;

    for (pattern, value) in entries {
        if compile(name, pattern, interpreter)?.is_match(text) {
            return Ok(Some(value));
        }
    }

    Ok(None)
}

fn compile(name: &str, pattern: &str, interpreter: &Interpreter) -> EvalResult<Regex> {
    Regex::new(pattern).map_err(|e| RuntimeError::Native { name:     name.to_string(),
                                                           details:  e.to_string(),
                                                           position: interpreter.call_site(), })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    fn run(source: &str) -> Result<Value, Error> {
        Interpreter::new().run(source)
    }

    #[test]
    fn matches_anywhere_in_the_text() {
        assert_eq!(run("return regexMatch('b+', 'abbc')").unwrap(), Value::Bool(true));
        assert_eq!(run("return regexMatch('^b', 'abbc')").unwrap(), Value::Bool(false));
    }

    #[test]
    fn map_keys_are_patterns() {
        let routes = "routes = {}\nroutes['^/users/[0-9]+$'] = 'user'\nroutes['^/$'] = 'home'\n";

        assert_eq!(run(&format!("{routes}return regexMapValue(routes, '/users/42')")).unwrap(),
                   Value::from("user"));
        assert_eq!(run(&format!("{routes}return regexMapValue(routes, '/nope')")).unwrap(),
                   Value::Nil);
        assert_eq!(run(&format!("{routes}return regexMapMatch(routes, '/')")).unwrap(),
                   Value::Bool(true));
    }

    #[test]
    fn invalid_patterns_are_native_errors() {
        let error = run("return regexMatch('(', 'x')").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Native { name, .. }) if name == "regexMatch"));
    }

    #[test]
    fn arguments_must_be_strings() {
        let error = run("return regexMatch(1, 'x')").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Type { .. })));
    }
}
