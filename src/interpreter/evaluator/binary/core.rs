use crate::{
    ast::{BinaryExpression, BinaryOperator, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{arithmetic, comparison},
            core::{EvalResult, Interpreter},
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates both operands, left first, then applies the operator.
    pub(crate) fn eval_binary_expression(&mut self,
                                         binary: &BinaryExpression)
                                         -> EvalResult<Value> {
        let left = self.eval_expr(&binary.left)?;
        let right = self.eval_expr(&binary.right)?;

        eval_binary(binary.operator, left, right, binary.position)
    }
}

/// Applies a binary operator to two evaluated values.
///
/// Each operator is defined only for the type combinations listed in its
/// handler; every other combination is a `Type` error naming the operator and
/// both operand types.
///
/// # Parameters
/// - `operator`: The operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
/// - `position`: Position of the operator for error reporting.
///
/// # Example
/// ```
/// use quip::{
///     ast::{BinaryOperator, Position},
///     interpreter::{evaluator::binary::core::eval_binary, value::core::Value},
/// };
///
/// let result = eval_binary(BinaryOperator::Add,
///                          Value::from("ab"),
///                          Value::from("cd"),
///                          Position::default());
///
/// assert_eq!(result.unwrap(), Value::from("abcd"));
/// ```
pub fn eval_binary(operator: BinaryOperator,
                   left: Value,
                   right: Value,
                   position: Position)
                   -> EvalResult<Value> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, In, Less, LessEqual, Mul, NotIn, Sub,
    };

    match operator {
        Add => arithmetic::add(left, right, position),
        Sub => arithmetic::sub(left, right, position),
        Mul | Div => arithmetic::mul_div(operator, &left, &right, position),
        Greater | GreaterEqual | Less | LessEqual => {
            comparison::relational(operator, &left, &right, position)
        },
        Equal => Ok(Value::Bool(left == right)),
        In => comparison::contains(operator, &left, &right, position).map(Value::Bool),
        NotIn => {
            comparison::contains(operator, &left, &right, position).map(|found| Value::Bool(!found))
        },
    }
}

/// Builds the `Type` error for an operator applied to unsupported operands.
pub(crate) fn operand_error(operator: BinaryOperator,
                            left: &Value,
                            right: &Value,
                            position: Position)
                            -> RuntimeError {
    RuntimeError::Type { operation: format!("'{operator}'"),
                         operands: format!("{} and {}", left.type_name(), right.type_name()),
                         position }
}
