//! Range expression evaluation.
//!
//! A range expression is a two-sided interval written as a string:
//!
//! | Value kind | Expression            | Test                                 |
//! |------------|-----------------------|--------------------------------------|
//! | Number     | `100-200`, `1 to 5`   | `min <= value <= max`                |
//! | Date       | `2024-01-01 to 2024-12-31` | `min <= date <= max`            |
//! | Text       | `1-10`                | `min <= char count <= max`           |
//! | Text       | `apple-cherry`        | collated between the two bounds      |
//!
//! Bounds are inclusive and taken literally: an inverted range such as
//! `200-100` matches nothing. A malformed expression is a non-match, never
//! an error.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse::{parse_date, parse_number, parse_value_as, ParsedValue, ValueKind};
use crate::value::{Timestamp, Value};

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([0-9]{4}[-/][0-9]{2}[-/][0-9]{2})\s*(?:to|/|,|–|-)\s*([0-9]{4}[-/][0-9]{2}[-/][0-9]{2})$",
    )
    .expect("date range pattern is valid")
});

const DELIMITERS: &[&str] = &["-", "to", ","];

/// Tests a raw cell against a list of range expressions.
///
/// Returns `true` if any expression matches. An empty list never matches,
/// and neither does a missing or null cell.
///
/// ```
/// use tabula_filter::{range_filter, Number, Value};
///
/// let v = Value::Number(Number::I64(150));
/// assert!(range_filter(&v, &["100-200"]));
/// assert!(!range_filter(&v, &["300-400"]));
/// assert!(range_filter(&v, &["300-400", "100-200"]));
/// assert!(range_filter(&Value::String("hello"), &["1-10"]));
/// ```
pub fn range_filter<S: AsRef<str>>(value: &Value<'_>, expressions: &[S]) -> bool {
    range_filter_as(value, expressions, ValueKind::Auto)
}

/// Like [`range_filter`], normalizing the cell with a declared kind.
pub fn range_filter_as<S: AsRef<str>>(
    value: &Value<'_>,
    expressions: &[S],
    kind: ValueKind,
) -> bool {
    if value.is_missing() || expressions.is_empty() {
        return false;
    }
    let parsed = parse_value_as(value, kind);
    expressions
        .iter()
        .any(|expr| matches_expression(&parsed, expr.as_ref().trim()))
}

/// Tests an already normalized value against one expression.
pub fn matches_expression(parsed: &ParsedValue<'_>, expression: &str) -> bool {
    match parsed {
        ParsedValue::Date(date) => date_filter_evaluation(expression, *date),
        ParsedValue::Number(n) => {
            let (min, max) = split_bounds(expression);
            match numeric_bounds(min, max) {
                Some((lo, hi)) => lo <= *n && *n <= hi,
                None => {
                    tracing::trace!(expression, "numeric range bounds did not parse");
                    false
                }
            }
        }
        ParsedValue::Text(text) => {
            let (min, max) = split_bounds(expression);
            match numeric_bounds(min, max) {
                Some((lo, hi)) => {
                    let len = text.chars().count() as f64;
                    lo <= len && len <= hi
                }
                None => {
                    collate(text, min) != Ordering::Less
                        && collate(text, max.unwrap_or("")) != Ordering::Greater
                }
            }
        }
    }
}

/// Tests a date against a `<date> <sep> <date>` expression.
///
/// Both dates must be `YYYY-MM-DD` or `YYYY/MM/DD`; the separator is one of
/// `to`, `/`, `,`, `–` or `-`. Anything else evaluates to `false`.
///
/// ```
/// use tabula_filter::{date_filter_evaluation, parse_date};
///
/// let june = parse_date("2024-06-15").unwrap();
/// assert!(date_filter_evaluation("2024-01-01 to 2024-12-31", june));
/// assert!(!date_filter_evaluation("2024-12-31 to 2024-01-01", june));
/// ```
pub fn date_filter_evaluation(expression: &str, value: Timestamp) -> bool {
    let Some(caps) = DATE_RANGE.captures(expression.trim()) else {
        tracing::trace!(expression, "not a date range expression");
        return false;
    };
    let min = caps.get(1).and_then(|m| parse_date(m.as_str()));
    let max = caps.get(2).and_then(|m| parse_date(m.as_str()));
    match (min, max) {
        (Some(min), Some(max)) => min <= value && value <= max,
        _ => false,
    }
}

/// Splits an expression at its delimiters (`-`, `to` or `,`).
///
/// The lower part runs up to the first delimiter and the upper part up to
/// the next one; anything after that is ignored, so `1-2-3` reads as `1`
/// to `2`. Both parts are trimmed. Without a delimiter the whole expression
/// is the lower part and the upper part is absent.
pub fn split_bounds(expression: &str) -> (&str, Option<&str>) {
    let Some((i, len)) = find_delimiter(expression) else {
        return (expression.trim(), None);
    };
    let rest = &expression[i + len..];
    let upper = match find_delimiter(rest) {
        Some((j, _)) => &rest[..j],
        None => rest,
    };
    (expression[..i].trim(), Some(upper.trim()))
}

/// Byte offset and length of the leftmost delimiter.
fn find_delimiter(s: &str) -> Option<(usize, usize)> {
    s.char_indices().find_map(|(i, _)| {
        DELIMITERS
            .iter()
            .find(|d| s[i..].starts_with(**d))
            .map(|d| (i, d.len()))
    })
}

fn numeric_bounds(min: &str, max: Option<&str>) -> Option<(f64, f64)> {
    Some((parse_number(min)?, parse_number(max?)?))
}

/// Compares two strings approximately the way a locale collator does.
///
/// Base letters decide first, with accents and case folded away. Ties are
/// broken by accents (unaccented first), then by case with lowercase
/// before uppercase, so `apple < Apple < banana`.
pub fn collate(a: &str, b: &str) -> Ordering {
    let base = |s: &str| deunicode::deunicode(s).to_lowercase();
    let swap_case = |s: &str| -> String {
        s.chars()
            .flat_map(|c| {
                let swapped: Vec<char> = if c.is_uppercase() {
                    c.to_lowercase().collect()
                } else {
                    c.to_uppercase().collect()
                };
                swapped
            })
            .collect()
    };
    base(a)
        .cmp(&base(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}
