use tracing::{debug, warn};

use crate::interpreter::{
    evaluator::core::{EvalResult, Frame, Interpreter, Scope},
    value::core::Value,
};

impl Interpreter {
    /// Pushes a fresh empty scope on top of the stack.
    ///
    /// # Example
    /// ```
    /// use quip::interpreter::evaluator::core::Interpreter;
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.push_scope();
    ///
    /// assert_eq!(interpreter.scope_depth(), 2);
    /// ```
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
        debug!(depth = self.scopes.len(), "pushed scope");
    }

    /// Removes the innermost scope.
    ///
    /// The global scope and the active call frame are never removed; popping
    /// them is logged and ignored.
    ///
    /// # Example
    /// ```
    /// use quip::interpreter::{evaluator::core::Interpreter, value::core::Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.assign("a", Value::Int(1));
    /// interpreter.push_scope();
    /// interpreter.assign("a", Value::Int(2));
    /// assert_eq!(interpreter.lookup("a"), Some(&Value::Int(2)));
    ///
    /// interpreter.pop_scope();
    /// assert_eq!(interpreter.lookup("a"), Some(&Value::Int(1)));
    /// ```
    pub fn pop_scope(&mut self) {
        if self.scopes.len() <= self.frame_base() + 1 {
            warn!(depth = self.scopes.len(), "refusing to pop the global scope or call frame");
            return;
        }

        self.scopes.pop();
        debug!(depth = self.scopes.len(), "popped scope");
    }

    /// Number of scopes on the stack, the global scope included.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `name` in the innermost scope.
    ///
    /// A binding of the same name in an enclosing scope is shadowed, not
    /// changed, and becomes visible again once the inner scope is popped.
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Resolves `name`.
    ///
    /// Lookup begins at the innermost scope and proceeds outward. Inside a
    /// call it searches the call's own frame, then the frames the called
    /// function was defined in, then the global scope, so a function never
    /// sees the locals of an unrelated caller.
    ///
    /// # Returns
    /// A reference to the value if found, otherwise `None`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.resolve(name).map(|(_, value)| value)
    }

    /// Like [`lookup`](Self::lookup), also returning the frame the binding
    /// lives in.
    pub(crate) fn resolve(&self, name: &str) -> Option<(Option<usize>, &Value)> {
        let Some(innermost) = self.frames.len().checked_sub(1) else {
            return self.scopes
                       .iter()
                       .rev()
                       .find_map(|scope| scope.get(name))
                       .map(|value| (None, value));
        };

        let mut frame = Some(innermost);
        while let Some(index) = frame {
            let base = self.frames[index].base;
            let end = self.frames
                          .get(index + 1)
                          .map_or(self.scopes.len(), |above| above.base);

            if let Some(value) = self.scopes[base..end].iter()
                                                       .rev()
                                                       .find_map(|scope| scope.get(name))
            {
                return Some((Some(index), value));
            }
            frame = self.frames[index].parent;
        }

        self.scopes[0].get(name).map(|value| (None, value))
    }

    /// Index of the first scope of the active call frame; `0` outside calls.
    pub(crate) fn frame_base(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.base)
    }

    /// Runs `body` inside a new call frame seeded with `frame`.
    ///
    /// `parent` is the frame whose bindings stay visible inside the call. The
    /// frame, and anything `body` pushed above it, is removed again on every
    /// exit path, errors included.
    pub(crate) fn in_frame<T>(&mut self,
                              frame: Scope,
                              parent: Option<usize>,
                              body: impl FnOnce(&mut Self) -> EvalResult<T>)
                              -> EvalResult<T> {
        let base = self.scopes.len();
        self.scopes.push(frame);
        self.frames.push(Frame { base, parent });
        debug!(depth = self.scopes.len(), "entered call frame");

        let result = body(self);

        self.scopes.truncate(base);
        self.frames.pop();
        debug!(depth = self.scopes.len(), "left call frame");

        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn global_scope_is_never_popped() {
        let mut interpreter = Interpreter::new();
        interpreter.assign("g", Value::Int(1));

        interpreter.pop_scope();

        assert_eq!(interpreter.scope_depth(), 1);
        assert_eq!(interpreter.lookup("g"), Some(&Value::Int(1)));
    }

    #[test]
    fn shadowing_is_undone_on_pop() {
        let mut interpreter = Interpreter::new();
        interpreter.push_scope();
        interpreter.assign("a", Value::Int(2));

        interpreter.pop_scope();

        assert_eq!(interpreter.lookup("a"), None);
    }

    #[test]
    fn frames_see_globals_but_not_callers() {
        let mut interpreter = Interpreter::new();
        interpreter.assign("global", Value::Int(1));
        interpreter.push_scope();
        interpreter.assign("caller", Value::Int(2));

        let seen = interpreter.in_frame(Scope::new(), None, |inner| {
                                  Ok((inner.lookup("global").cloned(),
                                      inner.lookup("caller").cloned()))
                              })
                              .unwrap();

        assert_eq!(seen, (Some(Value::Int(1)), None));
        assert_eq!(interpreter.scope_depth(), 2);
    }

    #[test]
    fn defining_frames_stay_visible() {
        let mut interpreter = Interpreter::new();
        let outer = Scope::from([("helper".to_string(), Value::Int(7))]);

        let seen = interpreter.in_frame(outer, None, |outer| {
                                  outer.in_frame(Scope::new(), Some(0), |inner| {
                                           Ok(inner.lookup("helper").cloned())
                                       })
                              })
                              .unwrap();

        assert_eq!(seen, Some(Value::Int(7)));
    }

    #[test]
    fn frames_unwind_on_error() {
        let mut interpreter = Interpreter::new();

        let result: EvalResult<()> = interpreter.in_frame(Scope::new(), None, |inner| {
                                                    inner.push_scope();
                                                    Err(Value::Nil.type_error("test",
                                                                              Default::default()))
                                                });

        assert!(result.is_err());
        assert_eq!(interpreter.scope_depth(), 1);
    }
}
