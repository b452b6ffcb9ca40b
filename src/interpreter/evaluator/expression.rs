use std::collections::BTreeMap;

use crate::{
    ast::{Assign, Block, Expr, Field, Member, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
    stack::ensure_sufficient_stack,
};

impl Interpreter {
    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Operands,
    /// list elements, mapping entries and call arguments are evaluated left to
    /// right.
    ///
    /// # Example
    /// ```
    /// use quip::{
    ///     ast::Statement,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    ///     parse,
    /// };
    ///
    /// let program = parse("[1 + 1, 'a']").unwrap();
    /// let Statement::Expression(expr) = &program.statements[0] else {
    ///     unreachable!()
    /// };
    ///
    /// let value = Interpreter::new().eval_expr(expr).unwrap();
    /// assert_eq!(value, Value::from(vec![Value::Int(2), Value::from("a")]));
    /// ```
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| -> EvalResult<Value> {
            match expr {
                Expr::Variable(variable) => {
                    self.lookup(&variable.name)
                        .cloned()
                        .or_else(|| self.native(&variable.name).cloned().map(Value::Native))
                        .ok_or_else(|| RuntimeError::Name { name:     variable.name.clone(),
                                                            position: variable.position, })
                },
                Expr::Literal(literal) => Ok(Value::from(&literal.value)),
                Expr::Binary(binary) => self.eval_binary_expression(binary),
                Expr::List(list) => {
                    let values = list.values
                                     .iter()
                                     .map(|value| self.eval_expr(value))
                                     .collect::<EvalResult<Vec<_>>>()?;
                    Ok(Value::List(values))
                },
                Expr::Block(block) => self.eval_map_literal(block),
                Expr::Call(call) => self.eval_call(call),
                Expr::Field(field) => self.eval_field(field),
            }
        })
    }

    /// Evaluates a block in expression position as a mapping literal.
    ///
    /// Every statement must be trivia or an assignment to a bare name.
    ///
    /// # Errors
    /// Returns `Structure` for any other statement.
    fn eval_map_literal(&mut self, block: &Block) -> EvalResult<Value> {
        let mut entries = BTreeMap::new();

        for statement in &block.statements {
            match statement {
                Statement::Assign(Assign { target: Expr::Variable(key),
                                           value,
                                           .. }) => {
                    let value = self.eval_expr(value)?;
                    entries.insert(key.name.clone(), value);
                },
                statement if statement.is_trivia() => {},
                other => {
                    let details = "A mapping literal may only contain assignments to names.";
                    return Err(RuntimeError::Structure { details:  details.to_string(),
                                                         position: other.position(), });
                },
            }
        }

        Ok(Value::Map(entries))
    }

    /// Evaluates `object.member`, `object[key]` or `object.name(args)`.
    ///
    /// A bare object name that is not bound reads as `nil`, so optional
    /// settings can be probed with `config.verbose` before `config` exists.
    fn eval_field(&mut self, field: &Field) -> EvalResult<Value> {
        let object = match field.object.as_ref() {
            Expr::Variable(variable) => self.lookup(&variable.name).cloned().unwrap_or_default(),
            object => self.eval_expr(object)?,
        };

        self.member_of(object, field)
    }

    /// Reads the member described by `field` from an evaluated object.
    ///
    /// - `.name` on a mapping yields the entry or `nil`.
    /// - `[key]` takes a string key on a mapping or an integer index on a list
    ///   and yields `nil` when absent.
    /// - `.name(args)` calls the mapping's callable entry `name` if there is
    ///   one, otherwise the function `name`.
    /// - Any member of `nil` is `nil`.
    pub(crate) fn member_of(&mut self, object: Value, field: &Field) -> EvalResult<Value> {
        match &field.member {
            Member::Name(name) => match object {
                Value::Map(mut entries) => Ok(entries.remove(&name.name).unwrap_or_default()),
                Value::Nil => Ok(Value::Nil),
                other => Err(other.type_error("field access", field.position)),
            },
            Member::Index(index) => {
                let key = self.eval_expr(index)?;
                match (object, key) {
                    (Value::Map(mut entries), Value::Str(key)) => {
                        Ok(entries.remove(&key).unwrap_or_default())
                    },
                    (Value::List(mut values), Value::Int(index)) => {
                        Ok(usize::try_from(index).ok()
                                                 .filter(|&index| index < values.len())
                                                 .map(|index| values.swap_remove(index))
                                                 .unwrap_or_default())
                    },
                    (Value::Nil, _) => Ok(Value::Nil),
                    (object, key) => {
                        Err(RuntimeError::Type { operation: "index".to_string(),
                                                 operands:  format!("{} and {}",
                                                                    object.type_name(),
                                                                    key.type_name()),
                                                 position:  field.position, })
                    },
                }
            },
            Member::Call(call) => {
                let args = self.eval_arguments(&call.parameters)?;
                match object {
                    Value::Map(mut entries)
                        if entries.get(&call.name).is_some_and(Value::is_callable) =>
                    {
                        let callee = entries.remove(&call.name).unwrap_or_default();
                        self.call_value(&call.name, callee, None, args, call.position)
                    },
                    _ => self.call_function(&call.name, args, call.position),
                }
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
    fn mapping_lookups() {
        assert_eq!(run("m = {a = 1}\nreturn m['a']").unwrap(), Value::Int(1));
        assert_eq!(run("m = {a = 1}\nb = 'a'\nreturn m[b]").unwrap(), Value::Int(1));
        assert_eq!(run("m = {a = 1}\nreturn m.a").unwrap(), Value::Int(1));
        assert_eq!(run("m = {a = 1}\nreturn m.zzz").unwrap(), Value::Nil);
        assert_eq!(run("return unbound.a").unwrap(), Value::Nil);
    }

    #[test]
    fn list_indexing() {
        assert_eq!(run("xs = [1, 2, 3]\nreturn xs[2]").unwrap(), Value::Int(3));
        assert_eq!(run("xs = [1]\nreturn xs[5]").unwrap(), Value::Nil);
        assert!(run("xs = [1]\nreturn xs['a']").is_err());
    }

    #[test]
    fn method_style_calls() {
        let source = "double(x) {\n  return x * 2\n}\nm = {f = double}\nreturn m.f(4)";
        assert_eq!(run(source).unwrap(), Value::Int(8));

        assert_eq!(run("m = {}\nreturn m.len('abc')").unwrap(), Value::Int(3));
    }

    #[test]
    fn mapping_literals_reject_other_statements() {
        let error = run("m = {\n  echo(1)\n}").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Structure { position, .. })
                                if position.line == 1));
    }

    #[test]
    fn undefined_names() {
        let error = run("return nope").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Name { name, .. }) if name == "nope"));
    }
}
