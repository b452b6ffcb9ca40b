use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{Expr, Function, FunctionCall, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter, Scope, outside_loop},
            function::{builtin, print, regex, shell},
        },
        value::{
            core::Value,
            native::{Arity, NativeFunction},
        },
    },
    stack::ensure_sufficient_stack,
};

/// Signature shared by every entry of the built-in table.
///
/// A builtin receives the interpreter, for the call site and for natives that
/// call back into the language, and the evaluated arguments.
type BuiltinFn = fn(&mut Interpreter, &[Value]) -> EvalResult<Value>;

/// Defines the built-in natives as a static table.
///
/// Each entry provides a name, an [`Arity`] and a function pointer. The macro
/// produces `BUILTIN_TABLE`, which [`builtins`] turns into registry entries,
/// and the public name list `BUILTIN_FUNCTIONS`.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of the natives every interpreter starts with.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "echo"          => { arity: Arity::Variadic, func: print::echo },
    "echoln"        => { arity: Arity::Variadic, func: print::echoln },
    "len"           => { arity: Arity::Exact(1), func: builtin::len },
    "typeof"        => { arity: Arity::Exact(1), func: builtin::type_of },
    "str"           => { arity: Arity::Exact(1), func: builtin::str },
    "regexMatch"    => { arity: Arity::Exact(2), func: regex::regex_match },
    "regexMapMatch" => { arity: Arity::Exact(2), func: regex::regex_map_match },
    "regexMapValue" => { arity: Arity::Exact(2), func: regex::regex_map_value },
    "sh"            => { arity: Arity::Exact(1), func: shell::sh },
}

/// The built-in natives, ready to be registered.
pub(crate) fn builtins() -> impl Iterator<Item = NativeFunction> {
    BUILTIN_TABLE.iter()
                 .map(|def| NativeFunction::new(def.name, def.func).with_arity(def.arity))
}

impl Interpreter {
    /// Evaluates a call expression `name(args)`.
    ///
    /// Arguments are evaluated left to right before the callee is resolved.
    pub(crate) fn eval_call(&mut self, call: &FunctionCall) -> EvalResult<Value> {
        let args = self.eval_arguments(&call.parameters)?;
        self.call_function(&call.name, args, call.position)
    }

    pub(crate) fn eval_arguments(&mut self, parameters: &[Expr]) -> EvalResult<Vec<Value>> {
        parameters.iter().map(|parameter| self.eval_expr(parameter)).collect()
    }

    /// Calls the function bound to `name`.
    ///
    /// Registered natives are found first; after that `name` is resolved like
    /// a variable and must hold a callable value.
    ///
    /// # Errors
    /// - `Name` if nothing is bound to `name`.
    /// - `Type` if the binding is not callable.
    /// - Whatever the callee raises.
    pub fn call_function(&mut self,
                         name: &str,
                         args: Vec<Value>,
                         position: Position)
                         -> EvalResult<Value> {
        if let Some(native) = self.natives.get(name).cloned() {
            return self.call_native(&native, &args, position);
        }

        let (defined_in, callee) =
            self.resolve(name)
                .map(|(frame, callee)| (frame, callee.clone()))
                .ok_or_else(|| RuntimeError::Name { name: name.to_string(),
                                                    position, })?;
        self.call_value(name, callee, defined_in, args, position)
    }

    /// Calls an already resolved callee.
    ///
    /// `defined_in` is the call frame the callee was found in; its bindings
    /// stay visible to a user function's body.
    pub(crate) fn call_value(&mut self,
                             name: &str,
                             callee: Value,
                             defined_in: Option<usize>,
                             args: Vec<Value>,
                             position: Position)
                             -> EvalResult<Value> {
        match callee {
            Value::Function(function) => self.call_user(&function, defined_in, args, position),
            Value::Native(native) => self.call_native(&native, &args, position),
            other => Err(RuntimeError::Type { operation: format!("call '{name}'"),
                                              operands:  other.type_name().to_string(),
                                              position, }),
        }
    }

    fn call_native(&mut self,
                   native: &NativeFunction,
                   args: &[Value],
                   position: Position)
                   -> EvalResult<Value> {
        if !native.arity().check(args.len()) {
            return Err(RuntimeError::Arity { name:     native.name().to_string(),
                                             expected: native.arity().to_string(),
                                             found:    args.len(),
                                             position, });
        }

        let saved = self.call_site;
        self.call_site = position;
        let result = native.call(self, args);
        self.call_site = saved;

        result
    }

    /// Runs a user function in a fresh call frame.
    ///
    /// The body sees its own frame, the frame it was defined in and the global
    /// scope. Parameters are bound positionally in the new frame, which is removed
    /// again however the body ends. A body that ends without `return` yields
    /// `nil`.
    ///
    /// # Errors
    /// - `Arity` if the argument count differs from the parameter count.
    /// - `RecursionLimit` past [`Config::max_call_depth`](crate::config::Config)
    ///   nested calls.
    /// - `Structure` for a `break` or `continue` outside any loop of the body.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name))]
    fn call_user(&mut self,
                 function: &Rc<Function>,
                 defined_in: Option<usize>,
                 args: Vec<Value>,
                 position: Position)
                 -> EvalResult<Value> {
        if args.len() != function.parameters.len() {
            return Err(RuntimeError::Arity { name:     function.name.clone(),
                                             expected: function.parameters.len().to_string(),
                                             found:    args.len(),
                                             position, });
        }

        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::RecursionLimit { limit: self.config.max_call_depth,
                                                      position, });
        }

        let frame = function.parameters
                            .iter()
                            .map(|parameter| parameter.name.clone())
                            .zip(args)
                            .collect::<Scope>();

        self.depth += 1;
        let flow = ensure_sufficient_stack(|| {
                       self.in_frame(frame, defined_in, |interpreter| {
                               interpreter.eval_statements(&function.body.statements)
                           })
                   });
        self.depth -= 1;

        match flow? {
            Flow::Normal => Ok(Value::Nil),
            Flow::Return(value) => {
                debug!(value = %value, "returned");
                Ok(value)
            },
            Flow::Break(position) => Err(outside_loop("break", position)),
            Flow::Continue(position) => Err(outside_loop("continue", position)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::Config, error::Error};

    fn run(source: &str) -> Result<Value, Error> {
        Interpreter::new().run(source)
    }

    #[test]
    fn every_builtin_is_registered() {
        let interpreter = Interpreter::new();

        for name in BUILTIN_FUNCTIONS {
            assert!(interpreter.native(name).is_some(), "{name} is missing");
        }
    }

    #[test]
    fn recursion_keeps_frames_apart() {
        let source = "f(n) {
  if n == 0 {
    return 0
  }
  return f(n - 1)
}
return f(5) == 0";

        assert_eq!(run(source).unwrap(), Value::Bool(true));
    }

    #[test]
    fn local_helpers_can_recurse() {
        let source = "outer() {
  g(n) {
    if n < 1 { return 0 }
    return g(n - 1)
  }
  return g(3)
}
return outer()";

        assert_eq!(run(source).unwrap(), Value::Int(0));
    }

    #[test]
    fn local_helpers_see_their_defining_body() {
        let source = "outer(base) {
  is_even(n) {
    if n == 0 { return true }
    return is_odd(n - 1)
  }
  is_odd(n) {
    if n == 0 { return false }
    return is_even(n - 1)
  }
  offset(n) {
    return n + base
  }
  return [is_even(base), offset(1)]
}
return outer(4)";

        assert_eq!(run(source).unwrap(),
                   Value::from(vec![Value::Bool(true), Value::Int(5)]));
    }

    #[test]
    fn frames_are_removed_after_the_call() {
        let mut interpreter = Interpreter::new();

        interpreter.run("f(a) {\n  b = a\n  return b\n}\nx = f(1)").unwrap();

        assert_eq!(interpreter.scope_depth(), 1);
        assert_eq!(interpreter.lookup("a"), None);
        assert_eq!(interpreter.lookup("b"), None);
    }

    #[test]
    fn functions_without_return_yield_nil() {
        assert_eq!(run("f() {\n  x = 1\n}\nreturn f()").unwrap(), Value::Nil);
    }

    #[test]
    fn argument_counts_are_checked() {
        let error = run("f(a, b) {\n  return a\n}\nreturn f(1)").unwrap_err();
        assert!(matches!(error, Error::Runtime(RuntimeError::Arity { found: 1, .. })));

        let error = run("return len(1, 2)").unwrap_err();
        assert!(matches!(error, Error::Runtime(RuntimeError::Arity { name, .. }) if name == "len"));
    }

    #[test]
    fn runaway_recursion_is_bounded() {
        let mut interpreter = Interpreter::with_config(Config::default().with_max_call_depth(20));

        let error = interpreter.run("f() {\n  return f()\n}\nreturn f()").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::RecursionLimit { limit: 20, .. })));
        assert_eq!(interpreter.scope_depth(), 1);
    }

    #[test]
    fn calling_a_non_function() {
        let error = run("x = 1\nreturn x()").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Type { operands, .. }) if operands == "int"));
    }

    #[test]
    fn natives_are_values() {
        assert_eq!(run("measure = len\nreturn measure('abcd')").unwrap(), Value::Int(4));
    }

    #[test]
    fn stray_break_in_a_function() {
        let error = run("f() {\n  break\n}\nreturn f()").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Structure { .. })));
    }
}
