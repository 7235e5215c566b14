//! Errors raised while compiling selectors or replacing the compiled cache.

use thiserror::Error;

/// Result alias used throughout the query compiler.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Everything that can go wrong in [`crate::Query`].
///
/// None of these are recovered internally: a failure in one comma-separated
/// chunk aborts the whole `compile` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The chunk was empty, or no simple selector could be read from it.
    #[error("Invalid selector: '{selector}'")]
    InvalidSelector {
        /// The (trimmed) text that could not be parsed.
        selector: String,
    },

    /// The pseudo-class is unknown, or `nth-child` had an expression that is
    /// empty or not one of the supported forms.
    #[error("Invalid selector: unknown pseudo-class ':{name}'")]
    UnsupportedPseudoClass {
        /// Pseudo-class name without the leading colon.
        name: String,
        /// Parenthesized argument, if one was given.
        expression: Option<String>,
    },

    /// The replacement for the compiled cache was not a mapping of strings.
    #[error("set_compiled expects a mapping of strings, {found} given")]
    InvalidCacheReplacement {
        /// Description of what was supplied instead.
        found: String,
    },
}

impl QueryError {
    pub(crate) fn invalid_selector(selector: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
        }
    }
}
