//! Table configuration and filter state loading.
//!
//! A table UI keeps two documents: the column configuration (which
//! columns exist and how they filter) and the filter state (what the user
//! picked). Both load from JSON or YAML with camelCase keys:
//!
//! ```json
//! {
//!   "columns": [
//!     { "id": "value", "filterVariant": "range", "valueKind": "number" },
//!     { "id": "status", "filterVariant": "multi-select" },
//!     { "id": "message" }
//!   ]
//! }
//! ```
//!
//! ```json
//! {
//!   "columnFilters": [
//!     { "id": "value", "value": ["100-200"] },
//!     { "id": "status", "value": ["success", "pending"] }
//!   ],
//!   "globalFilter": "fix"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::column::ColumnConfig;
use crate::error::{FilterError, Result};
use crate::filter::FilterSet;

/// Column configuration of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl TableConfig {
    /// Creates a configuration from columns.
    pub fn new(columns: impl IntoIterator<Item = ColumnConfig>) -> Self {
        TableConfig {
            columns: columns.into_iter().collect(),
        }
    }

    /// Parses a JSON configuration.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a YAML configuration.
    pub fn from_yaml(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Resolves a filter state into a [`FilterSet`].
    ///
    /// Cleared filters are skipped. The global filter searches every
    /// configured column.
    ///
    /// ```
    /// use tabula_filter::{FilterState, TableConfig};
    ///
    /// let table = TableConfig::from_yaml(r#"
    /// columns:
    ///   - id: value
    ///     filterVariant: range
    ///   - id: status
    ///     filterVariant: multi-select
    /// "#).unwrap();
    ///
    /// let state = FilterState::from_json(r#"{
    ///     "columnFilters": [
    ///         { "id": "value", "value": ["100-200"] },
    ///         { "id": "status", "value": [] }
    ///     ]
    /// }"#).unwrap();
    ///
    /// let filters = table.resolve(&state).unwrap();
    /// assert_eq!(filters.len(), 1);
    /// assert!(filters.get("value").is_some());
    /// ```
    pub fn resolve(&self, state: &FilterState) -> Result<FilterSet> {
        let mut filters = FilterSet::new();
        for entry in &state.column_filters {
            let column = self
                .column(&entry.id)
                .ok_or_else(|| FilterError::UnknownColumn(entry.id.clone()))?;
            if let Some(filter) = column.resolve(&entry.value)? {
                filters.insert(filter);
            }
        }

        if let Some(needle) = state.global_filter.as_deref() {
            filters = filters.global_search(needle, self.columns.iter().map(|c| c.id.clone()));
        }

        tracing::debug!(
            columns = self.columns.len(),
            active = filters.len(),
            global = filters.global().is_some(),
            "resolved filter state"
        );
        Ok(filters)
    }
}

/// Filter state of one table, as a table UI stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub column_filters: Vec<ColumnFilterState>,
    #[serde(default)]
    pub global_filter: Option<String>,
}

/// Raw filter value of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilterState {
    pub id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FilterState {
    /// Parses a JSON filter state.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a YAML filter state.
    pub fn from_yaml(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }
}
