//! Simple-selector segmentation.
//!
//! A selector chunk such as `div#main > ul.nav li:first-child` is read as a
//! flat sequence of [`Segment`]s, one simple selector at a time. Each segment
//! records the exact text it consumed so the caller can advance past it.
//!
//! The grammar of one segment, matched left to right, every part optional:
//!
//! ```text
//! tag       [A-Za-z0-9_*|-]+
//! id        '#' [A-Za-z0-9_|-]+
//! classes   '.' [A-Za-z0-9_|.-]+
//! attrs     ( '[' name ( '=' value )? ']' )*
//! pseudo    ':' [A-Za-z0-9_-]* ( '(' [^)]+ ')' )?
//! relation  whitespace* '>'?
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{QueryError, Result};

/// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
///
/// Tag used when a segment names no element type.
pub const UNIVERSAL_TAG: &str = "*";

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// A pseudo-class qualifier, e.g. `:nth-child(2n+1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pseudo {
    /// Name without the leading colon.
    pub name: String,
    /// Text between the parentheses, if any.
    pub expression: Option<String>,
}

/// One simple selector, as read from the front of a selector chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// The exact text consumed, including trailing whitespace and `>`.
    pub selector: String,

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Element name, [`UNIVERSAL_TAG`] when omitted.
    pub tag: String,

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    pub id: Option<String>,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Class names in source order, empty names dropped.
    pub classes: Vec<String>,

    /// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
    ///
    /// Attribute name to expected value; `None` means a presence test.
    /// A repeated name keeps its first position and takes the later value.
    pub attributes: IndexMap<String, Option<String>>,

    /// Pseudo-class, if one was given with a non-empty name.
    pub pseudo: Option<Pseudo>,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    ///
    /// Set when the segment ended with `>`: the next segment is a direct child.
    pub child: bool,
}

/// Check if a character can appear in a tag name.
const fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '*' | '|' | '-')
}

/// Check if a character can appear in an id.
const fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '|' | '-')
}

/// Check if a character can appear in a class run (dots included).
const fn is_class_char(c: char) -> bool {
    is_id_char(c) || c == '.'
}

/// Check if a character can appear in a pseudo-class name.
const fn is_pseudo_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

/// Reads [`Segment`]s off the front of its input, one at a time.
#[derive(Debug, Clone)]
struct SegmentParser {
    /// The input being parsed
    input: Vec<char>,
    /// Current position in the input
    position: usize,
}

impl SegmentParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Consume characters while `pred` holds and return them.
    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.peek().is_some_and(&pred) {
            self.position += 1;
        }
        self.input[start..self.position].iter().collect()
    }

    /// Position of the first `close` at or after `from`, if any.
    fn find(&self, from: usize, close: char) -> Option<usize> {
        self.input
            .get(from..)?
            .iter()
            .position(|&c| c == close)
            .map(|offset| from + offset)
    }

    /// `#` followed by at least one id character.
    fn consume_id(&mut self) -> Option<String> {
        if self.peek() != Some('#') || !self.peek_at(1).is_some_and(is_id_char) {
            return None;
        }
        self.position += 1;
        Some(self.consume_while(is_id_char))
    }

    /// `.` followed by a run of class characters. Consecutive dots produce
    /// empty names, which are dropped.
    fn consume_classes(&mut self) -> Vec<String> {
        if self.peek() != Some('.') || !self.peek_at(1).is_some_and(is_class_char) {
            return Vec::new();
        }
        self.consume_while(is_class_char)
            .split('.')
            .filter(|class| !class.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Zero or more `[...]` clauses. Brackets do not nest: a clause ends at
    /// the first `]`. An unterminated clause is left unconsumed.
    fn consume_attributes(&mut self) -> IndexMap<String, Option<String>> {
        let mut attributes = IndexMap::new();

        while self.peek() == Some('[') {
            let Some(close) = self.find(self.position + 1, ']') else {
                break;
            };
            let clause: String = self.input[self.position + 1..close].iter().collect();
            self.position = close + 1;

            if clause.is_empty() {
                continue;
            }

            // Only the first two `=`-separated parts are kept: in `[a=b=c]`
            // the trailing `=c` is dropped.
            let mut parts = clause.split('=');
            let name = parts.next().unwrap_or_default().to_string();
            let value = parts
                .next()
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            let _ = attributes.insert(name, value);
        }

        attributes
    }

    /// `:name` with an optional `(expr)`. The colon is consumed even when the
    /// name is empty, but then no pseudo-class is recorded.
    fn consume_pseudo(&mut self) -> Option<Pseudo> {
        if self.peek() != Some(':') {
            return None;
        }
        self.position += 1;
        let name = self.consume_while(is_pseudo_char);

        let mut expression = None;
        let open = self.position;
        if self.peek() == Some('(')
            && let Some(close) = self.find(open + 1, ')')
            && close > open + 1
        {
            expression = Some(self.input[open + 1..close].iter().collect::<String>());
            self.position = close + 1;
        }

        if name.is_empty() {
            return None;
        }
        Some(Pseudo { name, expression })
    }

    /// Optional whitespace, then an optional `>`.
    fn consume_relation(&mut self) -> bool {
        let _ = self.consume_while(char::is_whitespace);
        if self.peek() == Some('>') {
            self.position += 1;
            return true;
        }
        false
    }

    /// Whether everything up to the end of the input has been read.
    fn is_exhausted(&self) -> bool {
        self.position >= self.input.len()
    }

    /// The unread part of the input, for error messages.
    fn rest(&self) -> String {
        self.input[self.position..].iter().collect()
    }

    /// Read the next segment, then skip the whitespace that follows it.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSelector`] if nothing could be read.
    fn next_segment(&mut self) -> Result<Segment> {
        let start = self.position;
        let tag = self.consume_while(is_tag_char);
        let id = self.consume_id();
        let classes = self.consume_classes();
        let attributes = self.consume_attributes();
        let pseudo = self.consume_pseudo();
        let child = self.consume_relation();

        if self.position == start {
            return Err(QueryError::InvalidSelector {
                selector: self.rest(),
            });
        }
        let selector = self.input[start..self.position].iter().collect();
        let _ = self.consume_while(char::is_whitespace);

        Ok(Segment {
            selector,
            tag: if tag.is_empty() {
                UNIVERSAL_TAG.to_string()
            } else {
                tag
            },
            id,
            classes,
            attributes,
            pseudo,
            child,
        })
    }
}

/// Parse one simple selector from the front of `selector`.
///
/// Leading and trailing whitespace is ignored. The returned
/// [`Segment::selector`] is the prefix of the trimmed input that was read.
///
/// # Errors
///
/// Returns [`QueryError::InvalidSelector`] if `selector` is blank, or if no
/// simple selector could be read from its front (e.g. `~ p`, `.`).
pub fn get_segments(selector: &str) -> Result<Segment> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(QueryError::invalid_selector(selector));
    }
    SegmentParser::new(selector).next_segment()
}

/// Iterator over the segments of one selector chunk, left to right.
///
/// Parsing is lazy: each segment is read only when requested, so a caller
/// that processes segments as they arrive sees an earlier segment before a
/// later parse error. A blank chunk yields a single error. After an error
/// the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Segments {
    parser: SegmentParser,
    started: bool,
    failed: bool,
}

impl Segments {
    /// Start segmenting `selector`.
    #[must_use]
    pub fn new(selector: &str) -> Self {
        Self {
            parser: SegmentParser::new(selector.trim()),
            started: false,
            failed: false,
        }
    }
}

impl Iterator for Segments {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || (self.started && self.parser.is_exhausted()) {
            return None;
        }
        self.started = true;

        if self.parser.is_exhausted() {
            self.failed = true;
            return Some(Err(QueryError::invalid_selector("")));
        }

        let segment = self.parser.next_segment();
        self.failed = segment.is_err();
        Some(segment)
    }
}

/// Parse a whole chunk into its segment chain.
///
/// # Errors
///
/// Returns the first [`QueryError::InvalidSelector`] encountered.
pub fn segment_chain(selector: &str) -> Result<Vec<Segment>> {
    Segments::new(selector).collect()
}
