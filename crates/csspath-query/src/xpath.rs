//! `XPath` step assembly.
//!
//! [XPath 1.0 § 2.5 Abbreviated Syntax](https://www.w3.org/TR/1999/REC-xpath-19991116/#path-abbrev)
//!
//! Each [`Segment`] becomes one location step: an axis prefix, a node test
//! (the tag) and at most one bracketed predicate combining every condition.

use std::fmt;

use crate::error::Result;
use crate::pseudo::convert_pseudo;
use crate::segment::Segment;

/// Axis a step is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// `//`, abbreviation of `/descendant-or-self::node()/`.
    #[default]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    ///
    /// `/`, a plain child step.
    Child,
}

impl Axis {
    /// The path prefix for this axis.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => "//",
            Self::Child => "/",
        }
    }

    /// Axis for the step following `segment`.
    #[must_use]
    pub const fn after(segment: &Segment) -> Self {
        if segment.child {
            Self::Child
        } else {
            Self::Descendant
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// [XPath 1.0 § 4.2 String Functions](https://www.w3.org/TR/1999/REC-xpath-19991116/#section-String-Functions)
///
/// Whitespace-token membership test against the `class` attribute.
fn class_predicate(class: &str) -> String {
    format!(r#"contains(concat(" ", normalize-space(@class), " "), " {class} ")"#)
}

/// Build the `XPath` step for one segment.
///
/// Predicates are emitted in a fixed order: id, attributes (in parsed order),
/// classes (in parsed order), then the pseudo-class. One predicate is written
/// as `[p]`; several as `[(p1) and (p2) ...]`. Names and values are copied
/// verbatim, without quoting or escaping.
///
/// # Errors
///
/// Returns [`crate::QueryError::UnsupportedPseudoClass`] if the segment's
/// pseudo-class cannot be translated.
pub fn build_xpath(segment: &Segment, axis: Axis) -> Result<String> {
    let mut predicates = Vec::new();

    if let Some(id) = &segment.id {
        predicates.push(format!("@id='{id}'"));
    }

    for (name, value) in &segment.attributes {
        predicates.push(value.as_ref().map_or_else(
            || format!("@{name}"),
            |value| format!(r#"@{name}="{value}""#),
        ));
    }

    predicates.extend(segment.classes.iter().map(|class| class_predicate(class)));

    if let Some(pseudo) = &segment.pseudo {
        let expression = pseudo.expression.as_deref().unwrap_or_default();
        predicates.push(convert_pseudo(&pseudo.name, expression)?);
    }

    let mut xpath = format!("{axis}{}", segment.tag);
    match predicates.as_slice() {
        [] => {}
        [predicate] => {
            xpath.push('[');
            xpath.push_str(predicate);
            xpath.push(']');
        }
        _ => {
            xpath.push_str("[(");
            xpath.push_str(&predicates.join(") and ("));
            xpath.push_str(")]");
        }
    }

    Ok(xpath)
}
