/// Stack space that must remain before a recursive step runs without growing.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment if less than the red zone
/// is left on the current one.
///
/// Parsing and evaluation recurse once per nesting level of the source, so
/// deeply nested scripts would otherwise exhaust a thread's stack long before
/// any configured limit is reached.
///
/// ## Example
/// ```
/// use quip::stack::ensure_sufficient_stack;
///
/// fn depth(n: u64) -> u64 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
