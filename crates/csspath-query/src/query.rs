//! Selector compilation.
//!
//! [`Query::compile`] splits a selector list on commas, compiles each chunk
//! through the segment loop and joins the resulting paths with `|`
//! ([XPath 1.0 § 3.3 Node-sets](https://www.w3.org/TR/1999/REC-xpath-19991116/#node-sets)).
//! Compiled chunks are memoized in the query's [`CompiledCache`].

use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::cache::{CompiledCache, CompiledMap};
use crate::error::Result;
use crate::segment::Segments;
use crate::xpath::{Axis, build_xpath};

/// The language an expression passed to [`Query::compile`] is written in.
///
/// Parses ASCII case-insensitively from `css`/`xpath`, and displays as
/// `CSS`/`XPATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ExpressionType {
    /// A CSS selector list, compiled to `XPath`.
    #[default]
    Css,
    /// Already `XPath`; passed through untouched.
    Xpath,
}

impl ExpressionType {
    /// Interpret a free-form type token. Anything that is not `XPATH`
    /// (in any case) means CSS.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

/// Compile one selector chunk (no commas) into an `XPath` expression.
///
/// The first step is rendered with `axis`; each following step uses `/` if
/// the previous segment ended with `>`, and `//` otherwise. Each step is built
/// before the next segment is parsed.
///
/// # Errors
///
/// Returns [`crate::QueryError::InvalidSelector`] if the chunk is blank or a
/// segment cannot be read, and [`crate::QueryError::UnsupportedPseudoClass`]
/// if a pseudo-class cannot be translated.
pub fn css_to_xpath(selector: &str, axis: Axis) -> Result<String> {
    let mut xpath = String::new();
    let mut axis = axis;

    for segment in Segments::new(selector) {
        let segment = segment?;
        xpath.push_str(&build_xpath(&segment, axis)?);
        axis = Axis::after(&segment);
    }

    Ok(xpath)
}

/// CSS-to-`XPath` compiler with its own memo of compiled chunks.
///
/// # Example
///
/// ```
/// use csspath_query::{ExpressionType, Query};
///
/// let mut query = Query::new();
/// let xpath = query.compile("#main > p, a", ExpressionType::Css).unwrap();
/// assert_eq!(xpath, "//*[@id='main']/p|//a");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    compiled: CompiledCache,
}

impl Query {
    /// Create a compiler with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler that starts from an existing cache.
    #[must_use]
    pub const fn with_cache(compiled: CompiledCache) -> Self {
        Self { compiled }
    }

    /// Compile `expression` to `XPath`.
    ///
    /// `XPath` input is returned unchanged without touching the cache. CSS input
    /// is split on `,`; every trimmed chunk is looked up in the cache and
    /// compiled with [`css_to_xpath`] on a miss. Results are joined with `|`,
    /// in input order, duplicates included.
    ///
    /// # Errors
    ///
    /// The first failing chunk aborts the whole call. Chunks before it stay
    /// cached; nothing is stored for the failing chunk or any after it.
    pub fn compile(&mut self, expression: &str, expression_type: ExpressionType) -> Result<String> {
        if expression_type == ExpressionType::Xpath {
            return Ok(expression.to_string());
        }

        let mut paths = Vec::new();
        for chunk in expression.split(',').map(str::trim) {
            if let Some(path) = self.compiled.get(chunk) {
                paths.push(path.to_string());
                continue;
            }

            let path = css_to_xpath(chunk, Axis::Descendant)?;
            self.compiled.set(chunk, path.clone());
            paths.push(path);
        }

        Ok(paths.join("|"))
    }

    /// Compile `expression` with a free-form type token such as `"xpath"`.
    ///
    /// # Errors
    ///
    /// See [`Query::compile`].
    pub fn compile_as(&mut self, expression: &str, type_token: &str) -> Result<String> {
        self.compile(expression, ExpressionType::from_token(type_token))
    }

    /// Snapshot of every memoized chunk and its `XPath`.
    #[must_use]
    pub fn get_compiled(&self) -> CompiledMap {
        self.compiled.snapshot()
    }

    /// Replace the memo wholesale.
    pub fn set_compiled(&mut self, compiled: CompiledMap) {
        self.compiled.replace(compiled);
    }

    /// Replace the memo from a JSON value, e.g. one read back from disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::InvalidCacheReplacement`] unless `value`
    /// is an object of strings. The memo is unchanged on error.
    pub fn set_compiled_value(&mut self, value: Value) -> Result<()> {
        self.compiled.replace_from_value(value)
    }

    /// The memo itself.
    #[must_use]
    pub const fn cache(&self) -> &CompiledCache {
        &self.compiled
    }

    /// Give up the compiler and keep its memo.
    #[must_use]
    pub fn into_cache(self) -> CompiledCache {
        self.compiled
    }
}
