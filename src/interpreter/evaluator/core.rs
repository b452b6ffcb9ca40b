use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{Position, Program, Statement},
    config::Config,
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::function::core::builtins,
        parser::{Parser, parse},
        value::{core::Value, native::NativeFunction},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// One level of the binding stack.
pub type Scope = HashMap<String, Value>;

/// How a statement or statement list finished.
///
/// `Return`, `Break` and `Continue` travel outward as ordinary values until
/// the construct that consumes them: a call for `Return`, a loop for the other
/// two. The positions of `break` and `continue` are kept for the error raised
/// when nothing consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through; carry on with the next statement.
    Normal,
    /// A `return` is unwinding to the enclosing call.
    Return(Value),
    /// A `break` is unwinding to the enclosing loop.
    Break(Position),
    /// A `continue` is unwinding to the enclosing loop.
    Continue(Position),
}

/// The tree-walking interpreter.
///
/// Holds the scope stack and the native-function registry. The stack always
/// has at least one scope, the global one, created at construction and never
/// popped. Each instance is independent; nothing is shared between
/// interpreters.
///
/// ## Example
/// ```
/// use quip::interpreter::{evaluator::core::Interpreter, value::core::Value};
///
/// let mut interpreter = Interpreter::new();
/// let source = "a=1\nb=2\nc=a+b\np(x,y){return x+y}\nd=p(a,b)\nreturn d-1";
///
/// assert_eq!(interpreter.run(source).unwrap(), Value::Int(2));
/// assert_eq!(interpreter.lookup("c"), Some(&Value::Int(3)));
/// ```
pub struct Interpreter {
    pub(crate) scopes:    Vec<Scope>,
    /// Active call frames, innermost last.
    pub(crate) frames:    Vec<Frame>,
    pub(crate) natives:   HashMap<String, NativeFunction>,
    pub(crate) config:    Config,
    pub(crate) depth:     usize,
    pub(crate) call_site: Position,
}

/// A user-function call on the scope stack.
///
/// `base` is the index of the frame's first scope. `parent` is the frame in
/// which the called function was found, if it was found inside a call, so a
/// helper defined in a function body can still see that body's bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) base:   usize,
    pub(crate) parent: Option<usize>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with the default [`Config`] and the built-in
    /// natives registered.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an interpreter with the given settings.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let natives = builtins().map(|native| (native.name().to_string(), native))
                                .collect();

        Self { scopes: vec![Scope::new()],
               frames: Vec::new(),
               natives,
               config,
               depth: 0,
               call_site: Position::default() }
    }

    /// Creates an interpreter whose global scope starts out as `globals`.
    ///
    /// ## Example
    /// ```
    /// use quip::interpreter::{
    ///     evaluator::core::{Interpreter, Scope},
    ///     value::core::Value,
    /// };
    ///
    /// let globals = Scope::from([("x".to_string(), Value::Int(4))]);
    /// let mut interpreter = Interpreter::with_scope(globals);
    ///
    /// assert_eq!(interpreter.run("return x * x").unwrap(), Value::Int(16));
    /// ```
    #[must_use]
    pub fn with_scope(globals: Scope) -> Self {
        let mut interpreter = Self::new();
        interpreter.scopes[0] = globals;
        interpreter
    }

    /// The active settings.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Runs source text, raw bytes, a parsed [`Program`] or a single
    /// [`Statement`].
    ///
    /// A program yields the value of its first top-level `return`, or `nil`.
    /// A single expression statement yields its value.
    ///
    /// # Errors
    /// Returns a parse error for unparseable source, or the first runtime
    /// error.
    pub fn run<R: Runnable>(&mut self, runnable: R) -> Result<Value, Error> {
        if self.is_debug() {
            debug!("debug mode on");
        }
        runnable.run_in(self)
    }

    /// Whether runtime failures should propagate to the host.
    ///
    /// True when [`Config::debug`] is set or the global variable `debug` is
    /// bound to `true`.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.config.debug || self.scopes[0].get("debug") == Some(&Value::Bool(true))
    }

    /// Adds a native function to the registry.
    ///
    /// # Errors
    /// Returns [`RuntimeError::DuplicateName`] if the name is taken; the
    /// existing entry is kept.
    pub fn register_function(&mut self, native: NativeFunction) -> Result<(), RuntimeError> {
        if self.natives.contains_key(native.name()) {
            return Err(RuntimeError::DuplicateName { name: native.name().to_string() });
        }

        debug!(name = native.name(), "registered native function");
        self.natives.insert(native.name().to_string(), native);
        Ok(())
    }

    /// Looks up a registered native by name.
    #[must_use]
    pub fn native(&self, name: &str) -> Option<&NativeFunction> {
        self.natives.get(name)
    }

    /// Position of the call currently being dispatched to a native, for
    /// natives reporting their own errors.
    #[must_use]
    pub const fn call_site(&self) -> Position {
        self.call_site
    }

    pub(crate) fn run_program(&mut self, program: &Program) -> EvalResult<Value> {
        match self.eval_statements(&program.statements)? {
            Flow::Normal => Ok(Value::Nil),
            Flow::Return(value) => Ok(value),
            Flow::Break(position) => Err(outside_loop("break", position)),
            Flow::Continue(position) => Err(outside_loop("continue", position)),
        }
    }

    pub(crate) fn run_statement(&mut self, statement: &Statement) -> EvalResult<Value> {
        if let Statement::Expression(expr) = statement {
            return self.eval_expr(expr);
        }

        match self.eval_statement(statement)? {
            Flow::Normal => Ok(Value::Nil),
            Flow::Return(value) => Ok(value),
            Flow::Break(position) => Err(outside_loop("break", position)),
            Flow::Continue(position) => Err(outside_loop("continue", position)),
        }
    }
}

/// The error for a `break` or `continue` that reached a call or program
/// boundary.
pub(crate) fn outside_loop(keyword: &str, position: Position) -> RuntimeError {
    RuntimeError::Structure { details: format!("'{keyword}' outside of a loop."),
                              position }
}

/// Anything [`Interpreter::run`] accepts.
pub trait Runnable {
    /// Runs `self` on `interpreter`.
    ///
    /// # Errors
    /// Returns a parse or runtime error.
    fn run_in(self, interpreter: &mut Interpreter) -> Result<Value, Error>;
}

impl Runnable for &str {
    fn run_in(self, interpreter: &mut Interpreter) -> Result<Value, Error> {
        let program = parse(self)?;
        Ok(interpreter.run_program(&program)?)
    }
}

impl Runnable for &String {
    fn run_in(self, interpreter: &mut Interpreter) -> Result<Value, Error> {
        self.as_str().run_in(interpreter)
    }
}

impl Runnable for &[u8] {
    fn run_in(self, interpreter: &mut Interpreter) -> Result<Value, Error> {
        let program = Parser::from_bytes(self)?.parse()?;
        Ok(interpreter.run_program(&program)?)
    }
}

impl Runnable for &Program {
    fn run_in(self, interpreter: &mut Interpreter) -> Result<Value, Error> {
        Ok(interpreter.run_program(self)?)
    }
}

impl Runnable for &Statement {
    fn run_in(self, interpreter: &mut Interpreter) -> Result<Value, Error> {
        Ok(interpreter.run_statement(self)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::value::native::Arity;

    #[test]
    fn runs_every_runnable() {
        let mut interpreter = Interpreter::new();
        let program = parse("x = 2\nreturn x + 1").unwrap();

        assert_eq!(interpreter.run("return 1").unwrap(), Value::Int(1));
        assert_eq!(interpreter.run(b"return 'b'".as_slice()).unwrap(), Value::from("b"));
        assert_eq!(interpreter.run(&program).unwrap(), Value::Int(3));
        assert_eq!(interpreter.run(&program.statements[2]).unwrap(), Value::Int(3));
    }

    #[test]
    fn duplicate_registration_keeps_the_original() {
        let mut interpreter = Interpreter::new();
        let first = NativeFunction::new("answer", |_, _| Ok(Value::Int(42)));
        let second = NativeFunction::new("answer", |_, _| Ok(Value::Int(0)));

        interpreter.register_function(first).unwrap();
        let error = interpreter.register_function(second).unwrap_err();

        assert_eq!(error, RuntimeError::DuplicateName { name: "answer".to_string() });
        assert_eq!(interpreter.run("return answer()").unwrap(), Value::Int(42));
    }

    #[test]
    fn builtins_cannot_be_replaced() {
        let mut interpreter = Interpreter::new();
        let echo = NativeFunction::new("echo", |_, _| Ok(Value::Nil)).with_arity(Arity::Exact(0));

        assert!(interpreter.register_function(echo).is_err());
    }

    #[test]
    fn debug_follows_config_or_global() {
        let mut interpreter = Interpreter::new();
        assert!(!interpreter.is_debug());

        interpreter.run("debug = true").unwrap();
        assert!(interpreter.is_debug());

        assert!(Interpreter::with_config(Config::default().with_debug(true)).is_debug());
    }

    #[test]
    fn stray_break_is_a_structure_error() {
        let mut interpreter = Interpreter::new();

        let error = interpreter.run("x = 1\nbreak").unwrap_err();

        assert!(matches!(error, Error::Runtime(RuntimeError::Structure { position, .. })
                                if position.line == 1));
    }
}
