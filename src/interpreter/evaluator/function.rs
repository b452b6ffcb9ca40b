/// Length, type and string conversion built-ins.
pub mod builtin;
/// Call dispatch for user functions and natives, and the table of built-ins.
pub mod core;
/// Console output built-ins.
pub mod print;
/// Regular-expression matching built-ins.
///
/// Patterns are compiled on each call; an invalid pattern is reported as a
/// native failure.
pub mod regex;
/// The `sh` built-in.
pub mod shell;
