use crate::{
    ast::{BinaryOperator, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{collection, core::operand_error},
            core::EvalResult,
        },
        value::core::Value,
    },
};

/// `+`: integer addition, string and list concatenation, mapping union.
pub fn add(left: Value, right: Value, position: Position) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => checked(a.checked_add(b), BinaryOperator::Add, position),
        (Value::Str(mut a), Value::Str(b)) => {
            a.push_str(&b);
            Ok(Value::Str(a))
        },
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        },
        (Value::Map(a), Value::Map(b)) => Ok(Value::Map(collection::union(a, b))),
        (left, right) => Err(operand_error(BinaryOperator::Add, &left, &right, position)),
    }
}

/// `-`: integer subtraction, or difference of a list or mapping by
/// structural equality.
pub fn sub(left: Value, right: Value, position: Position) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => checked(a.checked_sub(b), BinaryOperator::Sub, position),
        (Value::List(a), Value::List(b)) => Ok(Value::List(collection::list_difference(a, &b))),
        (Value::List(a), Value::Map(b)) => {
            let excluded = b.into_values().collect::<Vec<_>>();
            Ok(Value::List(collection::list_difference(a, &excluded)))
        },
        (Value::Map(a), Value::Map(b)) => Ok(Value::Map(collection::map_difference(a, &b))),
        (left, right) => Err(operand_error(BinaryOperator::Sub, &left, &right, position)),
    }
}

/// `*` and `/` over integers. Division truncates toward zero.
///
/// # Errors
/// - `DivideByZero` when dividing by `0`.
/// - `Overflow` when the result does not fit, including `i64::MIN / -1`.
pub fn mul_div(operator: BinaryOperator,
               left: &Value,
               right: &Value,
               position: Position)
               -> EvalResult<Value> {
    let (&Value::Int(a), &Value::Int(b)) = (left, right) else {
        return Err(operand_error(operator, left, right, position));
    };

    match operator {
        BinaryOperator::Mul => checked(a.checked_mul(b), operator, position),
        _ if b == 0 => Err(RuntimeError::DivideByZero { position }),
        _ => checked(a.checked_div(b), operator, position),
    }
}

fn checked(result: Option<i64>, operator: BinaryOperator, position: Position) -> EvalResult<Value> {
    result.map(Value::Int)
          .ok_or_else(|| RuntimeError::Overflow { operation: format!("'{operator}'"),
                                                  position })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const AT: Position = Position::new(0, 0, 1);

    #[test]
    fn integer_arithmetic_matches_rust() {
        for (a, b) in [(7, 2), (-7, 2), (0, 5), (i64::MAX, 1)] {
            assert_eq!(add(Value::Int(a), Value::Int(b), AT).ok(),
                       a.checked_add(b).map(Value::Int));
            assert_eq!(mul_div(BinaryOperator::Div, &Value::Int(a), &Value::Int(b), AT).unwrap(),
                       Value::Int(a / b));
        }
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(mul_div(BinaryOperator::Div, &Value::Int(1), &Value::Int(0), AT),
                   Err(RuntimeError::DivideByZero { position: AT }));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(mul_div(BinaryOperator::Mul, &Value::Int(i64::MAX), &Value::Int(2), AT),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(mul_div(BinaryOperator::Div, &Value::Int(i64::MIN), &Value::Int(-1), AT),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn concatenation() {
        assert_eq!(add("a".into(), "b".into(), AT).unwrap(), Value::from("ab"));
        let one = Value::from(vec![Value::Int(1)]);

        assert_eq!(add(one.clone(), one, AT).unwrap(),
                   Value::from(vec![Value::Int(1), Value::Int(1)]));
    }

    #[test]
    fn mismatched_types() {
        let error = add(Value::Int(1), Value::from("a"), AT).unwrap_err();

        assert_eq!(error.to_string(), "Error at 1:1: Cannot apply '+' to int and string.");
    }
}
