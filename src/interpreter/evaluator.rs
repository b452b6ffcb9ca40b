/// Binary operator evaluation.
///
/// Integer arithmetic, string concatenation, list and mapping union and
/// difference, ordering, equality and membership.
pub mod binary;
/// The interpreter state and its entry points.
///
/// Contains [`core::Interpreter`], the control-flow signal passed between
/// statements, and the [`core::Runnable`] inputs accepted by `run`.
pub mod core;
/// Expression evaluation, including mapping literals and member access.
pub mod expression;
/// `for` loops over lists and mappings.
pub mod for_loop;
/// Function calls.
///
/// Dispatches to registered natives and user-defined functions, checks
/// argument counts and bounds call depth.
pub mod function;
/// The scope stack.
pub mod scope;
/// Statement execution and assignment.
pub mod statement;
