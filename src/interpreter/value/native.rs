use std::{fmt, rc::Rc};

use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter},
    value::core::Value,
};

/// Signature of a native implementation: the interpreter state and the
/// evaluated positional arguments in, a value out.
pub type NativeFn = dyn Fn(&mut Interpreter, &[Value]) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a native function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any number of arguments.
    Variadic,
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Variadic => write!(f, "any number of"),
        }
    }
}

/// A named native function.
///
/// Cloning is cheap; clones share the implementation. Two handles are equal
/// when their names are.
///
/// ## Example
/// ```
/// use quip::interpreter::{
///     evaluator::core::Interpreter,
///     value::{
///         core::Value,
///         native::{Arity, NativeFunction},
///     },
/// };
///
/// let double = NativeFunction::new("double", |_, args| match args {
///                  [Value::Int(n)] => Ok(Value::Int(n * 2)),
///                  _ => Ok(Value::Nil),
///              }).with_arity(Arity::Exact(1));
///
/// let mut interpreter = Interpreter::new();
/// interpreter.register_function(double).unwrap();
///
/// assert_eq!(interpreter.run("return double(21)").unwrap(), Value::Int(42));
/// ```
#[derive(Clone)]
pub struct NativeFunction {
    name:  String,
    arity: Arity,
    func:  Rc<NativeFn>,
}

impl NativeFunction {
    /// Wraps `func` under `name`; the arity defaults to [`Arity::Variadic`].
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
        where F: Fn(&mut Interpreter, &[Value]) -> EvalResult<Value> + 'static
    {
        Self { name:  name.into(),
               arity: Arity::Variadic,
               func:  Rc::new(func), }
    }

    /// Restricts the accepted argument count.
    #[must_use]
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// The registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The accepted argument count.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Invokes the implementation. Arity is checked by the caller.
    pub fn call(&self, interpreter: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
        (self.func)(interpreter, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
