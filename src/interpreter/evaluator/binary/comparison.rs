use crate::{
    ast::{BinaryOperator, Position},
    interpreter::{
        evaluator::{binary::core::operand_error, core::EvalResult},
        value::core::Value,
    },
};

/// Compares two integers with `>`, `>=`, `<` or `<=`.
///
/// # Errors
/// Any operand that is not an integer is a `Type` error.
pub fn relational(operator: BinaryOperator,
                  left: &Value,
                  right: &Value,
                  position: Position)
                  -> EvalResult<Value> {
    let (&Value::Int(a), &Value::Int(b)) = (left, right) else {
        return Err(operand_error(operator, left, right, position));
    };

    let result = match operator {
        BinaryOperator::Greater => a > b,
        BinaryOperator::GreaterEqual => a >= b,
        BinaryOperator::Less => a < b,
        _ => a <= b,
    };
    Ok(Value::Bool(result))
}

/// Membership test behind `in` and `not in`.
///
/// A list contains `needle` when one of its elements is structurally equal to
/// it; a mapping contains a string `needle` when it has that key.
///
/// # Errors
/// Any other container, or a non-string needle for a mapping, is a `Type`
/// error naming `operator`.
pub fn contains(operator: BinaryOperator,
                needle: &Value,
                haystack: &Value,
                position: Position)
                -> EvalResult<bool> {
    match (needle, haystack) {
        (_, Value::List(values)) => Ok(values.contains(needle)),
        (Value::Str(key), Value::Map(entries)) => Ok(entries.contains_key(key)),
        _ => Err(operand_error(operator, needle, haystack, position)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const AT: Position = Position::new(0, 0, 1);

    #[test]
    fn membership_uses_structural_equality() {
        let nested = Value::from(vec![Value::from(vec![Value::Int(1)])]);

        assert_eq!(contains(BinaryOperator::In, &Value::from(vec![Value::Int(1)]), &nested, AT), Ok(true));
        assert_eq!(contains(BinaryOperator::In, &Value::Int(2), &Value::from(vec![Value::Int(1)]), AT), Ok(false));
    }

    #[test]
    fn membership_errors_name_the_operator() {
        let error = contains(BinaryOperator::NotIn, &Value::Int(1), &Value::Int(2), AT).unwrap_err();

        assert_eq!(error.to_string(), "Error at 1:1: Cannot apply 'not in' to int and int.");
    }

    #[test]
    fn relational_is_integer_only() {
        assert_eq!(relational(BinaryOperator::LessEqual, &Value::Int(2), &Value::Int(2), AT),
                   Ok(Value::Bool(true)));
        assert!(relational(BinaryOperator::Less, &Value::from("a"), &Value::from("b"), AT).is_err());
    }
}
