//! Value normalization.
//!
//! A raw cell is normalized into a [`ParsedValue`] before any range test.
//! The variant picked here decides which range grammar applies: dates go
//! through the date-range evaluator, numbers through the numeric interval
//! check, and text through the length or lexicographic check.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::{Timestamp, Value};

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("number pattern is valid")
});

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A cell value normalized for range comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue<'a> {
    /// Numeric value.
    Number(f64),
    /// Date value.
    Date(Timestamp),
    /// Anything that is neither a number nor a date.
    Text(Cow<'a, str>),
}

impl<'a> ParsedValue<'a> {
    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, ParsedValue::Number(_))
    }

    /// Returns `true` if this is a `Date` value.
    pub fn is_date(&self) -> bool {
        matches!(self, ParsedValue::Date(_))
    }

    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, ParsedValue::Text(_))
    }

    /// Extracts the numeric value, if present.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParsedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the date value, if present.
    pub fn as_date(&self) -> Option<Timestamp> {
        match self {
            ParsedValue::Date(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the text value, if present.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParsedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Declared semantic type of a column.
///
/// `Auto` infers the type from the shape of each value. The other kinds
/// pin the interpretation so a numeric-looking string in a text column
/// stays text, and a date column never reads `"2024"` as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Auto,
    Number,
    Date,
    Text,
}

impl ValueKind {
    /// Lowercase name, as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Auto => "auto",
            ValueKind::Number => "number",
            ValueKind::Date => "date",
            ValueKind::Text => "text",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a raw cell by sniffing its shape.
///
/// Numbers pass through. Strings are tried as a date first, then as a
/// number, and otherwise stay text. Any other value becomes its text
/// rendering. Never fails.
///
/// ```
/// use tabula_filter::{parse_value, Number, ParsedValue, Value};
///
/// assert_eq!(parse_value(&Value::Number(Number::I64(42))), ParsedValue::Number(42.0));
/// assert!(parse_value(&Value::String("2024-01-01")).is_date());
/// assert_eq!(parse_value(&Value::String("42")), ParsedValue::Number(42.0));
/// assert_eq!(parse_value(&Value::String("abc")).as_text(), Some("abc"));
/// ```
pub fn parse_value<'a>(value: &Value<'a>) -> ParsedValue<'a> {
    match value {
        Value::Number(n) => ParsedValue::Number(n.to_f64()),
        Value::Timestamp(t) => ParsedValue::Date(*t),
        Value::String(s) => {
            if let Some(date) = parse_date(s) {
                ParsedValue::Date(date)
            } else if let Some(n) = parse_number(s) {
                ParsedValue::Number(n)
            } else {
                ParsedValue::Text(Cow::Borrowed(s))
            }
        }
        other => ParsedValue::Text(other.to_text()),
    }
}

/// Normalizes a raw cell using the column's declared kind.
///
/// Values that do not fit the declared kind fall back to text.
pub fn parse_value_as<'a>(value: &Value<'a>, kind: ValueKind) -> ParsedValue<'a> {
    match kind {
        ValueKind::Auto => parse_value(value),
        ValueKind::Number => match value {
            Value::Number(n) => ParsedValue::Number(n.to_f64()),
            Value::String(s) => match parse_number(s) {
                Some(n) => ParsedValue::Number(n),
                None => ParsedValue::Text(Cow::Borrowed(s)),
            },
            other => ParsedValue::Text(other.to_text()),
        },
        ValueKind::Date => match value {
            Value::Timestamp(t) => ParsedValue::Date(*t),
            Value::String(s) => match parse_date(s) {
                Some(t) => ParsedValue::Date(t),
                None => ParsedValue::Text(Cow::Borrowed(s)),
            },
            other => ParsedValue::Text(other.to_text()),
        },
        ValueKind::Text => ParsedValue::Text(value.to_text()),
    }
}

/// Parses a decimal number.
///
/// Surrounding whitespace is ignored. The empty string, `NaN`, infinities
/// and hex literals are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if !NUMBER.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses an ISO-like date or date-time into a UTC timestamp.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 and offset-less date-times
/// (read as UTC). Calendar-invalid dates are rejected.
pub fn parse_date(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    // Every accepted form starts with a four-digit year and a separator.
    let bytes = s.as_bytes();
    if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    if !matches!(bytes[4], b'-' | b'/') {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Timestamp::from(date));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp::from(dt.with_timezone(&Utc)));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Timestamp::from(ndt));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    const JUNE_15_2024: i64 = 1_718_409_600_000;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(
            parse_value(&Value::Number(Number::I64(42))),
            ParsedValue::Number(42.0)
        );
        assert_eq!(
            parse_value(&Value::Number(Number::F64(-1.25))),
            ParsedValue::Number(-1.25)
        );
    }

    #[test]
    fn date_strings_become_dates() {
        assert_eq!(
            parse_value(&Value::String("2024-06-15")),
            ParsedValue::Date(Timestamp(JUNE_15_2024))
        );
        assert_eq!(
            parse_value(&Value::String("2024/06/15")),
            ParsedValue::Date(Timestamp(JUNE_15_2024))
        );
        assert_eq!(
            parse_value(&Value::String("2024-06-15T00:00:01Z")),
            ParsedValue::Date(Timestamp(JUNE_15_2024 + 1000))
        );
        assert_eq!(
            parse_value(&Value::String("2024-06-15T02:00:00+02:00")),
            ParsedValue::Date(Timestamp(JUNE_15_2024))
        );
        assert_eq!(
            parse_value(&Value::String("2024-06-15 00:00:00")),
            ParsedValue::Date(Timestamp(JUNE_15_2024))
        );
    }

    #[test]
    fn numeric_strings_are_not_dates() {
        assert_eq!(parse_value(&Value::String("42")), ParsedValue::Number(42.0));
        assert_eq!(
            parse_value(&Value::String("2024")),
            ParsedValue::Number(2024.0)
        );
        assert_eq!(
            parse_value(&Value::String(" 1e3 ")),
            ParsedValue::Number(1000.0)
        );
    }

    #[test]
    fn calendar_invalid_dates_are_text() {
        assert_eq!(
            parse_value(&Value::String("2024-02-30")).as_text(),
            Some("2024-02-30")
        );
        assert_eq!(
            parse_value(&Value::String("2024-13-01")).as_text(),
            Some("2024-13-01")
        );
    }

    #[test]
    fn other_strings_stay_text() {
        assert_eq!(parse_value(&Value::String("abc")).as_text(), Some("abc"));
        assert_eq!(parse_value(&Value::String("")).as_text(), Some(""));
        assert_eq!(parse_value(&Value::String("NaN")).as_text(), Some("NaN"));
        assert_eq!(
            parse_value(&Value::String("Infinity")).as_text(),
            Some("Infinity")
        );
    }

    #[test]
    fn non_scalar_values_render_as_text() {
        assert_eq!(parse_value(&Value::Bool(true)).as_text(), Some("true"));
        assert_eq!(
            parse_value(&Value::Other("[1,2]".into())).as_text(),
            Some("[1,2]")
        );
        assert_eq!(parse_value(&Value::None).as_text(), Some(""));
        assert_eq!(
            parse_value(&Value::Timestamp(Timestamp(5))),
            ParsedValue::Date(Timestamp(5))
        );
    }

    #[test]
    fn declared_kind_overrides_sniffing() {
        let v = Value::String("2024-06-15");
        assert!(parse_value_as(&v, ValueKind::Auto).is_date());
        assert!(parse_value_as(&v, ValueKind::Date).is_date());
        assert!(parse_value_as(&v, ValueKind::Text).is_text());
        assert!(parse_value_as(&v, ValueKind::Number).is_text());

        let n = Value::String("2024");
        assert_eq!(
            parse_value_as(&n, ValueKind::Number),
            ParsedValue::Number(2024.0)
        );
        assert!(parse_value_as(&n, ValueKind::Date).is_text());
        assert_eq!(
            parse_value_as(&Value::Number(Number::I64(7)), ValueKind::Text).as_text(),
            Some("7")
        );
    }

    #[test]
    fn number_grammar() {
        assert_eq!(parse_number("100"), Some(100.0));
        assert_eq!(parse_number(" -2.5 "), Some(-2.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("+3"), Some(3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("0x10"), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn date_grammar() {
        assert_eq!(parse_date("2024-06-15"), Some(Timestamp(JUNE_15_2024)));
        assert_eq!(parse_date("2024-06-15T00:00"), Some(Timestamp(JUNE_15_2024)));
        assert_eq!(parse_date("42"), None);
        assert_eq!(parse_date("June 15, 2024"), None);
        assert_eq!(parse_date("2024-06"), None);
    }
}
