use tracing::trace;

use crate::{
    ast::ForStatement,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
};

/// A loop cursor over the `(index, item)` pairs of a collection.
///
/// The pairs are taken from a snapshot of the collection when the loop starts,
/// so assigning to the iterated variable inside the body does not change what
/// is visited.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopCursor {
    items:  Vec<(Value, Value)>,
    cursor: usize,
}

impl LoopCursor {
    /// Builds a cursor over a list (integer indices) or a mapping (string
    /// keys, in key order).
    ///
    /// # Returns
    /// `None` if the value cannot be iterated.
    ///
    /// # Example
    /// ```
    /// use quip::interpreter::{evaluator::for_loop::LoopCursor, value::core::Value};
    ///
    /// let list = Value::from(vec![Value::from("a"), Value::from("b")]);
    /// let pairs = LoopCursor::over(list).unwrap().collect::<Vec<_>>();
    ///
    /// assert_eq!(pairs[1], (Value::Int(1), Value::from("b")));
    /// ```
    #[must_use]
    pub fn over(iterable: Value) -> Option<Self> {
        let items = match iterable {
            Value::List(values) => {
                values.into_iter()
                      .enumerate()
                      .map(|(index, item)| (Value::Int(i64::try_from(index).unwrap_or(i64::MAX)), item))
                      .collect()
            },
            Value::Map(entries) => entries.into_iter()
                                          .map(|(key, item)| (Value::Str(key), item))
                                          .collect(),
            _ => return None,
        };

        Some(Self { items, cursor: 0 })
    }
}

impl Iterator for LoopCursor {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.items.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(pair)
    }
}

impl Interpreter {
    /// Runs a `for` loop.
    ///
    /// Each iteration binds the item (and the index, when named) in the
    /// current scope, then runs the body in that same scope. `break` ends the
    /// loop, `continue` moves to the next item and `return` leaves the loop
    /// and travels on to the enclosing call.
    ///
    /// # Errors
    /// A `Type` error if the iterable is neither a list nor a mapping, or any
    /// error raised by the body.
    pub(crate) fn eval_for(&mut self, for_loop: &ForStatement) -> EvalResult<Flow> {
        let iterable = self.eval_expr(&for_loop.iterable)?;
        let cursor = LoopCursor::over(iterable.clone()).ok_or_else(|| {
                                                            iterable.type_error("for loop",
                                                                                for_loop.iterable.position())
                                                        })?;

        for (index, item) in cursor {
            trace!(item = %item, "loop iteration");

            if let Some(name) = &for_loop.index {
                self.assign(&name.name, index);
            }
            self.assign(&for_loop.item.name, item);

            match self.eval_statements(&for_loop.body.statements)? {
                Flow::Normal | Flow::Continue(_) => {},
                Flow::Break(_) => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{Error, RuntimeError};

    fn run(source: &str) -> Result<Value, Error> {
        Interpreter::new().run(source)
    }

    #[test]
    fn sums_a_list() {
        let source = "total = 0\nfor x in [1, 2, 3] {\n  total = total + x\n}\nreturn total";

        assert_eq!(run(source).unwrap(), Value::Int(6));
    }

    #[test]
    fn binds_the_index() {
        let source = "last = -1\nfor i, x in ['a', 'b'] {\n  last = i\n}\nreturn last";

        assert_eq!(run(source).unwrap(), Value::Int(1));
    }

    #[test]
    fn iterates_mappings_in_key_order() {
        let source = "keys = []\nfor k, v in {b = 2\na = 1} {\n  keys = keys + [k]\n}\nreturn keys";

        assert_eq!(run(source).unwrap().to_string(), "['a', 'b']");
    }

    #[test]
    fn break_and_continue() {
        let source = "seen = []
for x in [1, 2, 3, 4] {
  if x == 2 {
    continue
  }
  if x == 4 {
    break
  }
  seen = seen + [x]
}
return seen";

        assert_eq!(run(source).unwrap().to_string(), "[1, 3]");
    }

    #[test]
    fn return_leaves_the_loop() {
        let source = "first(xs) {\n  for x in xs {\n    return x\n  }\n}\nreturn first([7, 8])";

        assert_eq!(run(source).unwrap(), Value::Int(7));
    }

    #[test]
    fn only_collections_iterate() {
        let error = run("for x in 5 {\n}").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Type { operation, .. })
                                if operation == "for loop"));
    }
}
