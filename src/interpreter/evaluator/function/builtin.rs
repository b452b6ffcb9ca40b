use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Destructures the arguments of a fixed-arity native.
///
/// The registry checks arity before dispatch, so this only fails when a
/// native is called directly with the wrong number of arguments.
///
/// # Errors
/// Returns `Arity` positioned at the current call site.
pub(crate) fn expect_args<'a, const N: usize>(name: &str,
                                              interpreter: &Interpreter,
                                              args: &'a [Value])
                                              -> EvalResult<&'a [Value; N]> {
    args.try_into().map_err(|_| RuntimeError::Arity { name:     name.to_string(),
                                                      expected: N.to_string(),
                                                      found:    args.len(),
                                                      position: interpreter.call_site(), })
}

/// Length of a string (in characters), list or mapping.
///
/// # Example
/// ```
/// use quip::interpreter::{
///     evaluator::{core::Interpreter, function::builtin::len},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// let n = len(&mut interpreter, &[Value::from("héllo")]).unwrap();
///
/// assert_eq!(n, Value::Int(5));
/// ```
pub fn len(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [value] = expect_args::<1>("len", interpreter, args)?;

    let length = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(values) => values.len(),
        Value::Map(entries) => entries.len(),
        other => return Err(other.type_error("len", interpreter.call_site())),
    };

    Ok(Value::Int(i64::try_from(length).unwrap_or(i64::MAX)))
}

/// Type name of the argument, e.g. `'int'` or `'map'`.
pub fn type_of(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [value] = expect_args::<1>("typeof", interpreter, args)?;
    Ok(Value::from(value.type_name()))
}

/// Display rendering of the argument as a string.
pub fn str(interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [value] = expect_args::<1>("str", interpreter, args)?;
    Ok(Value::Str(value.to_string()))
}
