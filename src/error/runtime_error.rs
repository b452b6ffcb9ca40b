use thiserror::Error;

use crate::ast::Position;

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Referenced a variable or called a function that is not defined.
    #[error("Error at {position}: '{name}' is not defined.")]
    Name {
        /// The undefined name.
        name:     String,
        /// Where the name was used.
        position: Position,
    },
    /// Called a function with the wrong number of arguments.
    #[error("Error at {position}: '{name}' expects {expected} argument(s), but got {found}.")]
    Arity {
        /// The called function.
        name:     String,
        /// Human readable description of the accepted counts.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// Location of the call.
        position: Position,
    },
    /// An operation was applied to values of unsupported types.
    #[error("Error at {position}: Cannot apply {operation} to {operands}.")]
    Type {
        /// The attempted operation.
        operation: String,
        /// The operand type names, e.g. `int and string`.
        operands:  String,
        /// Location of the operation.
        position:  Position,
    },
    /// The right operand of `/` was zero.
    #[error("Error at {position}: Division by zero.")]
    DivideByZero {
        /// Location of the division.
        position: Position,
    },
    /// A construct appeared where it has no meaning, such as a call inside a
    /// mapping literal or `break` outside a loop.
    #[error("Error at {position}: {details}")]
    Structure {
        /// What was wrong.
        details:  String,
        /// Location of the offending construct.
        position: Position,
    },
    /// A native function with this name is already registered.
    #[error("A native function named '{name}' is already registered.")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },
    /// Integer arithmetic overflowed.
    #[error("Error at {position}: Integer overflow in {operation}.")]
    Overflow {
        /// The overflowing operator.
        operation: String,
        /// Location of the operation.
        position:  Position,
    },
    /// The call stack grew past the configured limit.
    #[error("Error at {position}: Maximum call depth of {limit} exceeded.")]
    RecursionLimit {
        /// The configured limit.
        limit:    usize,
        /// Location of the call that exceeded it.
        position: Position,
    },
    /// A native function failed on its own terms.
    #[error("Error at {position}: {name}: {details}")]
    Native {
        /// The failing native.
        name:     String,
        /// Failure description.
        details:  String,
        /// Location of the call.
        position: Position,
    },
}

impl RuntimeError {
    /// The position the error refers to, if it has one.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Name { position, .. }
            | Self::Arity { position, .. }
            | Self::Type { position, .. }
            | Self::DivideByZero { position }
            | Self::Structure { position, .. }
            | Self::Overflow { position, .. }
            | Self::RecursionLimit { position, .. }
            | Self::Native { position, .. } => Some(*position),
            Self::DuplicateName { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renders_one_based_location() {
        let error = RuntimeError::Name { name:     "x".to_string(),
                                         position: Position::new(0, 4, 1), };

        assert_eq!(error.to_string(), "Error at 1:5: 'x' is not defined.");
    }

    #[test]
    fn duplicate_name_has_no_position() {
        let error = RuntimeError::DuplicateName { name: "echo".to_string() };

        assert_eq!(error.position(), None);
    }
}
