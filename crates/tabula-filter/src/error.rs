//! Error types for the filter crate.
//!
//! Evaluating filters never fails; only turning configuration and UI filter
//! state into a [`FilterSet`](crate::FilterSet) can.

use thiserror::Error;

/// Errors that can occur when loading or resolving filter configuration.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Filter state names a column the table does not configure.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Filter value has a shape the column's variant cannot use.
    #[error("invalid {variant} filter value for column '{column}': got {found}")]
    InvalidFilterValue {
        column: String,
        variant: &'static str,
        found: &'static str,
    },

    /// Malformed JSON configuration.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML configuration.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for filter configuration operations.
pub type Result<T> = std::result::Result<T, FilterError>;
