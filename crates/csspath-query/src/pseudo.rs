//! Pseudo-class to `XPath` predicate translation.
//!
//! [§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
//!
//! Only the structural pseudo-classes with a direct positional equivalent are
//! supported. The predicates rely on
//! [XPath 1.0 § 2.4 Predicates](https://www.w3.org/TR/1999/REC-xpath-19991116/#predicates):
//! "if the result is a number, the result will be converted to true if the
//! number is equal to the context position". A bare `1` or `last()` inside
//! brackets is therefore a positional filter, not an equality test.

use crate::error::{QueryError, Result};

/// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
///
/// `odd` is `2n+1`.
const NTH_ODD: &str = "(position() -1) mod 2 = 0 and position() >= 1";

/// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
///
/// `even` is `2n+0`. The trailing `position() >= 0` always holds; it is kept
/// so generated expressions stay byte-for-byte stable.
const NTH_EVEN: &str = "position() mod 2 = 0 and position() >= 0";

/// Translate a pseudo-class into an `XPath` predicate body (without brackets).
///
/// | pseudo-class            | predicate                                                 |
/// |-------------------------|-----------------------------------------------------------|
/// | `:first-child`          | `1`                                                       |
/// | `:last-child`           | `last()`                                                  |
/// | `:nth-child(odd)`       | `(position() -1) mod 2 = 0 and position() >= 1`           |
/// | `:nth-child(even)`      | `position() mod 2 = 0 and position() >= 0`               |
/// | `:nth-child(N)`         | `position() = N`                                          |
/// | `:nth-child(An+B)`      | `(position() -B) mod A = 0 and position() >= B`           |
///
/// Names are matched case-sensitively. `An+B` requires both `A` and `B` as
/// unsigned decimal integers; the `n` may be upper case.
///
/// # Errors
///
/// Returns [`QueryError::UnsupportedPseudoClass`] for any other name, and for
/// `nth-child` with an empty or unrecognized expression.
pub fn convert_pseudo(name: &str, expression: &str) -> Result<String> {
    let predicate = match name {
        // [§ 14.4.3 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
        "first-child" => Some("1".to_string()),

        // [§ 14.4.4 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
        "last-child" => Some("last()".to_string()),

        "nth-child" => nth_child(expression),

        _ => None,
    };

    predicate.ok_or_else(|| QueryError::UnsupportedPseudoClass {
        name: name.to_string(),
        expression: (!expression.is_empty()).then(|| expression.to_string()),
    })
}

/// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
fn nth_child(expression: &str) -> Option<String> {
    match expression {
        "" => None,
        "odd" => Some(NTH_ODD.to_string()),
        "even" => Some(NTH_EVEN.to_string()),
        expr if is_numeric(expr) => Some(format!("position() = {expr}")),
        expr => {
            let (step, offset) = split_step_formula(expr)?;
            Some(format!(
                "(position() -{offset}) mod {step} = 0 and position() >= {offset}"
            ))
        }
    }
}

/// Split `An+B` into (`A`, `B`), both non-empty runs of ASCII digits.
fn split_step_formula(expression: &str) -> Option<(&str, &str)> {
    let n = expression.find(['n', 'N'])?;
    let step = &expression[..n];
    let offset = expression[n + 1..].strip_prefix('+')?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    (all_digits(step) && all_digits(offset)).then_some((step, offset))
}

/// Whether `text` reads as a decimal number: optional surrounding
/// whitespace, optional sign, digits with an optional fraction, and an
/// optional exponent.
fn is_numeric(text: &str) -> bool {
    let bytes = text.trim().as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
