//! CSS selector to `XPath` compilation.
//!
//! # Scope
//!
//! This crate implements:
//! - **Segmentation** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, id and class selectors
//!   - Attribute presence and exact-value selectors
//!   - One pseudo-class per simple selector, with an optional argument
//!   - Descendant (whitespace) and child (`>`) combinators
//!
//! - **Pseudo-classes** ([§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index))
//!   - `:first-child`, `:last-child`
//!   - `:nth-child(odd | even | N | An+B)`
//!
//! - **`XPath` generation** ([XPath 1.0](https://www.w3.org/TR/1999/REC-xpath-19991116/))
//!   - One location step per simple selector, predicates in a fixed order
//!   - Selector lists joined into a union with `|`
//!
//! - **Memoization**
//!   - Compiled chunks cached per [`Query`], readable and replaceable wholesale
//!
//! # Not Implemented
//!
//! - Sibling combinators (`+`, `~`)
//! - Attribute operators other than presence and `=`
//! - Pseudo-elements, `:not()`, several pseudo-classes on one simple selector
//! - Quoting or escaping of names and values in the generated `XPath`

/// Memoization of compiled selector chunks.
pub mod cache;
/// Error type shared by every operation.
pub mod error;
/// Pseudo-class to predicate translation.
pub mod pseudo;
/// Selector-list compilation and the [`Query`] entry point.
pub mod query;
/// Simple-selector segmentation.
pub mod segment;
/// `XPath` step assembly.
pub mod xpath;

// Re-exports for convenience
pub use cache::{CompiledCache, CompiledMap};
pub use error::{QueryError, Result};
pub use pseudo::convert_pseudo;
pub use query::{ExpressionType, Query, css_to_xpath};
pub use segment::{Pseudo, Segment, Segments, get_segments, segment_chain};
pub use xpath::{Axis, build_xpath};
