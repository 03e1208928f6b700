//! Column predicates.
//!
//! A [`ColumnFilter`] is the resolved, active filter of one column: the
//! column id, a [`Predicate`], and the declared [`ValueKind`] range tests
//! normalize with.

use crate::parse::ValueKind;
use crate::range::range_filter_as;
use crate::value::Value;

/// Active filter condition for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring of the cell text.
    Text(String),
    /// Cell text equals the value.
    Select(String),
    /// Cell text is one of the values.
    MultiSelect(Vec<String>),
    /// Cell satisfies at least one range expression.
    Range(Vec<String>),
}

impl Predicate {
    /// Returns `true` for range predicates.
    pub fn is_range(&self) -> bool {
        matches!(self, Predicate::Range(_))
    }

    /// Returns `true` for set-membership and equality predicates.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Predicate::Select(_) | Predicate::MultiSelect(_))
    }

    /// Name of the filter variant this predicate belongs to.
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Text(_) => "text",
            Predicate::Select(_) => "select",
            Predicate::MultiSelect(_) => "multi-select",
            Predicate::Range(_) => "range",
        }
    }
}

/// The active filter of one column.
///
/// ```
/// use tabula_filter::{ColumnFilter, Number, Value};
///
/// let filter = ColumnFilter::range("value", ["100-200", "300-400"]);
/// assert!(filter.matches(&Value::Number(Number::I64(350))));
/// assert!(!filter.matches(&Value::Number(Number::I64(250))));
///
/// let status = ColumnFilter::multi_select("status", ["success", "pending"]);
/// assert!(status.matches(&Value::String("pending")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    /// The column id.
    pub column: String,
    /// The condition.
    pub predicate: Predicate,
    /// How cells are normalized for range tests.
    pub kind: ValueKind,
}

impl ColumnFilter {
    /// Creates a filter with automatic value sniffing.
    pub fn new(column: impl Into<String>, predicate: Predicate) -> Self {
        ColumnFilter {
            column: column.into(),
            predicate,
            kind: ValueKind::Auto,
        }
    }

    /// Creates a range filter.
    pub fn range<I, S>(column: impl Into<String>, expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            column,
            Predicate::Range(expressions.into_iter().map(Into::into).collect()),
        )
    }

    /// Creates a set-membership filter.
    pub fn multi_select<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            column,
            Predicate::MultiSelect(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Creates an equality filter.
    pub fn select(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, Predicate::Select(value.into()))
    }

    /// Creates a substring filter.
    pub fn text(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(column, Predicate::Text(needle.into()))
    }

    /// Sets the declared value kind.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Evaluates this filter against a cell.
    ///
    /// Missing cells never match.
    pub fn matches(&self, cell: &Value<'_>) -> bool {
        if cell.is_missing() {
            return false;
        }
        match &self.predicate {
            Predicate::Range(expressions) => {
                range_filter_as(cell, expressions.as_slice(), self.kind)
            }
            Predicate::MultiSelect(values) => {
                let text = cell.to_text();
                values.iter().any(|v| *v == *text)
            }
            Predicate::Select(value) => *value == *cell.to_text(),
            Predicate::Text(needle) => contains_ignore_case(&cell.to_text(), needle),
        }
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
