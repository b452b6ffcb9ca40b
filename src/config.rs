/// Default bound on nested user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Interpreter settings.
///
/// ## Example
/// ```
/// use quip::config::Config;
///
/// let config = Config::default().with_debug(true).with_max_call_depth(50);
///
/// assert!(config.debug);
/// assert_eq!(config.max_call_depth, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Propagate top-level runtime failures instead of reporting them.
    pub debug:          bool,
    /// Maximum depth of nested user-function calls.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { debug:          false,
               max_call_depth: DEFAULT_MAX_CALL_DEPTH, }
    }
}

impl Config {
    /// Sets debug mode.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the call depth limit.
    #[must_use]
    pub const fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}
