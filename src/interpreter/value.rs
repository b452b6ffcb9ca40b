/// The runtime value type.
///
/// Defines the `Value` enum with its conversions, type names and rendering.
pub mod core;
/// Native function handles.
///
/// Defines `NativeFunction`, the callable wrapper stored in the interpreter's
/// registry, and `Arity`, the argument-count contract checked before a native
/// runs.
pub mod native;
