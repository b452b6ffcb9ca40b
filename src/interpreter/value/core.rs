use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    ast::{Function, LiteralValue, Position},
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::native::NativeFunction},
};

/// Represents a runtime value in the interpreter.
///
/// Composite values own their elements, so a value is independent of every
/// other value once produced. Equality is structural throughout, including for
/// lists, mappings and function references.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence of a value; produced by bodies without `return`, absent
    /// mapping members and side-effecting natives.
    #[default]
    Nil,
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A 64 bit signed integer.
    Int(i64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Self>),
    /// A mapping from names to values, kept in key order.
    Map(BTreeMap<String, Self>),
    /// A user-defined function.
    Function(Rc<Function>),
    /// A native function.
    Native(NativeFunction),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(v: BTreeMap<String, Self>) -> Self {
        Self::Map(v)
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Int(n) => (*n).into(),
            LiteralValue::Str(s) => s.as_str().into(),
        }
    }
}

impl Value {
    /// The name of the value's type as reported by `typeof` and in errors.
    ///
    /// # Example
    /// ```
    /// use quip::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Int(1).type_name(), "int");
    /// assert_eq!(Value::List(vec![]).type_name(), "list");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Function(_) => "function",
            Self::Native(_) => "native",
        }
    }

    /// Converts the value to `bool`, or returns an error if not boolean.
    ///
    /// Used for `if` conditions, which never coerce.
    ///
    /// # Parameters
    /// - `operation`: Name of the construct needing the boolean, for the error.
    /// - `position`: Source position for error reporting.
    pub fn as_bool(&self, operation: &str, position: Position) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(self.type_error(operation, position)),
        }
    }

    /// Borrows the string, or returns an error if not a string.
    pub fn as_str(&self, operation: &str, position: Position) -> EvalResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(self.type_error(operation, position)),
        }
    }

    /// Builds a `Type` error for applying `operation` to this value alone.
    #[must_use]
    pub fn type_error(&self, operation: &str, position: Position) -> RuntimeError {
        RuntimeError::Type { operation: operation.to_string(),
                             operands: self.type_name().to_string(),
                             position }
    }

    /// Whether the value is callable.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Native(_))
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(values) => {
                write!(f, "[")?;

                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    value.fmt_nested(f)?;
                }

                write!(f, "]")
            },
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = ")?;
                    value.fmt_nested(f)?;
                }
                write!(f, "}}")
            },
            Self::Function(function) => write!(f, "<function {}>", function.signature()),
            Self::Native(native) => write!(f, "<native {}>", native.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn strings_are_quoted_only_inside_collections() {
        let map = BTreeMap::from([("b".to_string(), Value::from("x")),
                                  ("a".to_string(), Value::from(vec![1.into(), "y".into()]))]);

        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::Map(map).to_string(), "{a = [1, 'y'], b = 'x'}");
    }

    #[test]
    fn equality_is_structural() {
        let left = Value::from(vec![Value::from(vec![1.into()]), "a".into()]);
        let right = Value::from(vec![Value::from(vec![1.into()]), "a".into()]);

        assert_eq!(left, right);
        assert_ne!(left, Value::from(vec![Value::from(vec![2.into()]), "a".into()]));
    }

    #[test]
    fn as_bool_rejects_other_types() {
        let error = Value::Int(1).as_bool("if condition", Position::default())
                                 .unwrap_err();

        assert!(matches!(error, RuntimeError::Type { operands, .. } if operands == "int"));
    }
}
