use std::{collections::BTreeMap, rc::Rc};

use tracing::trace;

use crate::{
    ast::{Expr, Field, Member, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
    stack::ensure_sufficient_stack,
};

impl Interpreter {
    /// Evaluates statements in source order.
    ///
    /// Stops at the first statement that does not finish normally and hands
    /// its [`Flow`] to the caller.
    pub fn eval_statements(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            match self.eval_statement(statement)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    /// Evaluates a single statement.
    ///
    /// - Assignments bind in the innermost scope, or write through a field.
    /// - Function definitions bind the function under its name.
    /// - `if` requires a boolean condition and runs its branch in the current
    ///   scope.
    /// - `return`, `break` and `continue` produce the matching [`Flow`].
    /// - Expression statements are evaluated for effect.
    /// - New-lines and comments do nothing.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        trace!(line = statement.position().line, "statement");

        ensure_sufficient_stack(|| -> EvalResult<Flow> {
            match statement {
                Statement::Assign(assign) => {
                    let value = self.eval_expr(&assign.value)?;
                    self.assign_to(&assign.target, value)?;
                    Ok(Flow::Normal)
                },
                Statement::Function(function) => {
                    self.assign(&function.name, Value::Function(Rc::new(function.clone())));
                    Ok(Flow::Normal)
                },
                Statement::If(conditional) => {
                    let condition = self.eval_expr(&conditional.condition)?
                                        .as_bool("if condition", conditional.condition.position())?;

                    if condition {
                        self.eval_statements(&conditional.body.statements)
                    } else if let Some(else_body) = &conditional.else_body {
                        self.eval_statements(&else_body.statements)
                    } else {
                        Ok(Flow::Normal)
                    }
                },
                Statement::For(for_loop) => self.eval_for(for_loop),
                Statement::Return(ret) => {
                    let value = match &ret.value {
                        Some(expr) => self.eval_expr(expr)?,
                        None => Value::Nil,
                    };
                    Ok(Flow::Return(value))
                },
                Statement::Break(position) => Ok(Flow::Break(*position)),
                Statement::Continue(position) => Ok(Flow::Continue(*position)),
                Statement::Expression(expr) => {
                    self.eval_expr(expr)?;
                    Ok(Flow::Normal)
                },
                Statement::NewLine(_) | Statement::Comment(_) => Ok(Flow::Normal),
            }
        })
    }

    /// Stores `value` into an assignment target.
    ///
    /// A field target reads its object (an absent or `nil` object starts out
    /// as an empty mapping), sets the member, then stores the updated object
    /// back into the object's own place, so `a.b.c = 1` rebuilds `a.b` and
    /// then `a`.
    fn assign_to(&mut self, target: &Expr, value: Value) -> EvalResult<()> {
        match target {
            Expr::Variable(variable) => {
                self.assign(&variable.name, value);
                Ok(())
            },
            Expr::Field(field) => {
                let object = self.place_value(&field.object)?;
                let updated = self.set_member(object, field, value)?;
                self.assign_to(&field.object, updated)
            },
            other => Err(RuntimeError::Structure { details:  format!("Cannot assign to '{other}'."),
                                                   position: other.position(), }),
        }
    }

    /// Current value of an assignable place, `nil` when it does not exist yet.
    fn place_value(&mut self, place: &Expr) -> EvalResult<Value> {
        match place {
            Expr::Variable(variable) => Ok(self.lookup(&variable.name).cloned().unwrap_or_default()),
            Expr::Field(field) => {
                let object = self.place_value(&field.object)?;
                if object == Value::Nil {
                    return Ok(Value::Nil);
                }
                self.member_of(object, field)
            },
            other => Err(RuntimeError::Structure { details:  format!("Cannot assign through '{other}'."),
                                                   position: other.position(), }),
        }
    }

    fn set_member(&mut self, object: Value, field: &Field, value: Value) -> EvalResult<Value> {
        let key = match &field.member {
            Member::Name(name) => Value::Str(name.name.clone()),
            Member::Index(index) => self.eval_expr(index)?,
            Member::Call(call) => {
                return Err(RuntimeError::Structure { details:  format!("Cannot assign to the call '{call}'."),
                                                     position: call.position, });
            },
        };

        match (object, key) {
            (Value::Nil, Value::Str(key)) => Ok(Value::Map(BTreeMap::from([(key, value)]))),
            (Value::Map(mut entries), Value::Str(key)) => {
                entries.insert(key, value);
                Ok(Value::Map(entries))
            },
            (Value::List(mut values), Value::Int(index)) => {
                let slot = usize::try_from(index).ok()
                                                 .and_then(|index| values.get_mut(index))
                                                 .ok_or_else(|| RuntimeError::Structure {
                                                     details:  format!("Index {index} is out of bounds."),
                                                     position: field.position,
                                                 })?;
                *slot = value;
                Ok(Value::List(values))
            },
            (object, key) => {
                Err(RuntimeError::Type { operation: "member assignment".to_string(),
                                         operands:  format!("{} and {}",
                                                            object.type_name(),
                                                            key.type_name()),
                                         position:  field.position, })
            },
        }
    }
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
    fn field_assignment_creates_the_mapping() {
        assert_eq!(run("m.a = 1\nreturn m").unwrap().to_string(), "{a = 1}");
        assert_eq!(run("m.a.b = 1\nreturn m").unwrap().to_string(), "{a = {b = 1}}");
    }

    #[test]
    fn index_assignment_updates_lists_and_maps() {
        assert_eq!(run("xs = [1, 2]\nxs[1] = 5\nreturn xs").unwrap().to_string(),
                   "[1, 5]");
        assert_eq!(run("m = {a = 1}\nk = 'b'\nm[k] = 2\nreturn m").unwrap().to_string(),
                   "{a = 1, b = 2}");
        assert!(run("xs = [1]\nxs[3] = 0").is_err());
    }

    #[test]
    fn if_requires_a_boolean() {
        let error = run("if 1 { x = 1 }").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Type { operands, .. }) if operands == "int"));
    }

    #[test]
    fn if_does_not_open_a_scope() {
        assert_eq!(run("if true { x = 3 }\nreturn x").unwrap(), Value::Int(3));
    }
}
