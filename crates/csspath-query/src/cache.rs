//! Memoization of compiled selector chunks.
//!
//! Keys are single trimmed chunks (never containing `,`), values are the
//! `XPath` fragments they compiled to. Entries keep insertion order and are
//! never evicted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QueryError, Result};

/// Ordered snapshot of the cache contents.
pub type CompiledMap = IndexMap<String, String>;

/// Mapping from selector chunk to compiled `XPath` fragment.
///
/// Owned by a [`crate::Query`]. There is no internal locking: callers that
/// share one across threads wrap it themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledCache {
    entries: CompiledMap,
}

impl CompiledCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the fragment compiled for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store `fragment` under `key`, replacing any previous value in place.
    pub fn set(&mut self, key: impl Into<String>, fragment: impl Into<String>) {
        let key = key.into();
        debug_assert!(!key.contains(','), "cache keys are single chunks");
        let _ = self.entries.insert(key, fragment.into());
    }

    /// Copy of the current contents, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> CompiledMap {
        self.entries.clone()
    }

    /// Replace the whole contents with `entries`.
    pub fn replace(&mut self, entries: CompiledMap) {
        self.entries = entries;
    }

    /// Replace the whole contents from a dynamically typed value.
    ///
    /// The value must be a JSON object whose members are all strings. On
    /// failure the cache is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidCacheReplacement`] if `value` is not an
    /// object, or if any member is not a string.
    pub fn replace_from_value(&mut self, value: Value) -> Result<()> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(QueryError::InvalidCacheReplacement {
                    found: json_kind(&other).to_string(),
                });
            }
        };

        let mut entries = CompiledMap::with_capacity(object.len());
        for (key, member) in object {
            let fragment = match member {
                Value::String(fragment) => fragment,
                other => {
                    return Err(QueryError::InvalidCacheReplacement {
                        found: format!("{} for key '{key}'", json_kind(&other)),
                    });
                }
            };
            let _ = entries.insert(key, fragment);
        }

        self.entries = entries;
        Ok(())
    }

    /// Number of memoized chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<CompiledMap> for CompiledCache {
    fn from(entries: CompiledMap) -> Self {
        Self { entries }
    }
}

/// Name of a JSON value's type, for error messages.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
