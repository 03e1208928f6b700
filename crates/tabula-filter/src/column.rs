//! Per-column filter configuration.
//!
//! A [`ColumnConfig`] says how a column is filtered: which
//! [`FilterVariant`] the UI offers and which [`ValueKind`] its cells have.
//! [`ColumnConfig::resolve`] turns the raw filter value a table UI stores
//! for the column into a [`ColumnFilter`].

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::parse::ValueKind;
use crate::predicate::{ColumnFilter, Predicate};

/// Filter UI offered for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterVariant {
    /// Free text, substring match.
    Text,
    /// One or more range expressions.
    Range,
    /// A single value.
    Select,
    /// Any of several values.
    MultiSelect,
}

impl FilterVariant {
    /// Kebab-case name, as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterVariant::Text => "text",
            FilterVariant::Range => "range",
            FilterVariant::Select => "select",
            FilterVariant::MultiSelect => "multi-select",
        }
    }
}

impl std::fmt::Display for FilterVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter configuration of one column.
///
/// ```
/// use serde_json::json;
/// use tabula_filter::{ColumnConfig, FilterVariant, Predicate};
///
/// let column = ColumnConfig::new("value").variant(FilterVariant::Range);
/// let filter = column.resolve(&json!(["100-200"])).unwrap().unwrap();
/// assert_eq!(filter.predicate, Predicate::Range(vec!["100-200".into()]));
///
/// // cleared filters resolve to nothing
/// assert!(column.resolve(&json!([])).unwrap().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    /// The column id rows are read with.
    pub id: String,
    /// Filter UI; `None` filters as free text.
    #[serde(default)]
    pub filter_variant: Option<FilterVariant>,
    /// Declared cell type.
    #[serde(default)]
    pub value_kind: ValueKind,
}

impl ColumnConfig {
    /// Creates a text-filtered column with sniffed values.
    pub fn new(id: impl Into<String>) -> Self {
        ColumnConfig {
            id: id.into(),
            filter_variant: None,
            value_kind: ValueKind::Auto,
        }
    }

    /// Sets the filter variant.
    pub fn variant(mut self, variant: FilterVariant) -> Self {
        self.filter_variant = Some(variant);
        self
    }

    /// Sets the declared value kind.
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.value_kind = kind;
        self
    }

    /// The effective filter variant.
    pub fn effective_variant(&self) -> FilterVariant {
        self.filter_variant.unwrap_or(FilterVariant::Text)
    }

    /// Returns `true` if the column filters by range expressions.
    pub fn is_range(&self) -> bool {
        self.effective_variant() == FilterVariant::Range
    }

    /// Resolves a raw filter value into an active filter.
    ///
    /// `null`, an empty list and an empty string mean the filter is
    /// cleared and yield `Ok(None)`. List variants accept a bare string as
    /// a one-element list; scalar variants accept strings, numbers and
    /// booleans.
    pub fn resolve(&self, value: &serde_json::Value) -> Result<Option<ColumnFilter>> {
        let variant = self.effective_variant();
        let predicate = match variant {
            FilterVariant::Range | FilterVariant::MultiSelect => {
                let values = self.list(value, variant)?;
                if values.is_empty() {
                    return Ok(None);
                }
                if variant == FilterVariant::Range {
                    Predicate::Range(values)
                } else {
                    Predicate::MultiSelect(values)
                }
            }
            FilterVariant::Select | FilterVariant::Text => {
                let Some(text) = self.scalar(value, variant)? else {
                    return Ok(None);
                };
                if variant == FilterVariant::Select {
                    Predicate::Select(text)
                } else {
                    Predicate::Text(text)
                }
            }
        };
        Ok(Some(
            ColumnFilter::new(self.id.clone(), predicate).with_kind(self.value_kind),
        ))
    }

    fn list(&self, value: &serde_json::Value, variant: FilterVariant) -> Result<Vec<String>> {
        match value {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
            serde_json::Value::String(s) => Ok(vec![s.clone()]),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => Ok(s.clone()),
                    other => Err(self.invalid(variant, json_type(other))),
                })
                .collect(),
            other => Err(self.invalid(variant, json_type(other))),
        }
    }

    fn scalar(&self, value: &serde_json::Value, variant: FilterVariant) -> Result<Option<String>> {
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) if s.is_empty() => Ok(None),
            serde_json::Value::String(s) => Ok(Some(s.clone())),
            serde_json::Value::Number(n) => Ok(Some(n.to_string())),
            serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(self.invalid(variant, json_type(other))),
        }
    }

    fn invalid(&self, variant: FilterVariant, found: &'static str) -> FilterError {
        FilterError::InvalidFilterValue {
            column: self.id.clone(),
            variant: variant.as_str(),
            found,
        }
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
