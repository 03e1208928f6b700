//! Tabula Filter - Column filter engine for data tables.
//!
//! Tabula Filter evaluates the column filters of a data table against
//! in-memory rows. It provides:
//!
//! - Value sniffing: cells are normalized to a number, a date or text
//! - Range expressions: numeric, date, string-length and lexicographic
//! - Column predicates: text search, select, multi-select and range
//! - Facet counts that keep every other filter applied while lifting the
//!   column's own filter
//! - Table configuration and filter state loading from JSON or YAML
//!
//! # Quick Start
//!
//! ```rust
//! use tabula_filter::{ColumnConfig, FilterSet, FilterVariant, Number, Value};
//!
//! struct Commit {
//!     author: String,
//!     value: i64,
//!     date: String,
//! }
//!
//! fn accessor<'a>(commit: &'a Commit, column: &str) -> Value<'a> {
//!     match column {
//!         "author" => Value::String(&commit.author),
//!         "value" => Value::Number(Number::I64(commit.value)),
//!         "date" => Value::String(&commit.date),
//!         _ => Value::None,
//!     }
//! }
//!
//! let commits = vec![
//!     Commit { author: "ada".into(), value: 150, date: "2024-03-01".into() },
//!     Commit { author: "bob".into(), value: 320, date: "2024-07-19".into() },
//!     Commit { author: "cy".into(), value: 90, date: "2023-12-24".into() },
//! ];
//!
//! let filters = FilterSet::new()
//!     .range("value", ["100-200", "300-400"])
//!     .range("date", ["2024-01-01 to 2024-12-31"]);
//!
//! let results = filters.filter(&commits, accessor);
//! assert_eq!(results.len(), 2);
//!
//! // How many rows each value bucket would leave, with the date filter kept
//! let value = ColumnConfig::new("value").variant(FilterVariant::Range);
//! let counts = filters.facet_counts(&commits, &value, &["0-100", "100-200"], accessor);
//! assert_eq!(counts.get("0-100"), Some(0));
//! assert_eq!(counts.get("100-200"), Some(1));
//! ```
//!
//! # Range Expressions
//!
//! | Cell normalizes to | Expression                   | Matches when                      |
//! |--------------------|------------------------------|-----------------------------------|
//! | Number             | `100-200`, `1 to 5`, `1,5`   | `min <= value <= max`             |
//! | Date               | `2024-01-01 to 2024-12-31`   | `min <= date <= max`              |
//! | Text               | `1-10`                       | `min <= length <= max`            |
//! | Text               | `apple-cherry`               | collates between the two bounds   |
//!
//! A list of expressions matches if any one does. Bounds are inclusive and
//! never swapped. Malformed expressions, inverted bounds and missing cells
//! evaluate to "no match"; evaluation never fails or panics.
//!
//! # Filter Semantics
//!
//! ```text
//! match = (every column filter matches) ∧ (global search matches, or none set)
//! ```
//!
//! Facet counts for column `C` use the same rule with `C`'s own filter
//! removed.

mod column;
mod config;
mod error;
mod facet;
mod filter;
mod parse;
mod predicate;
mod range;
mod traits;
mod value;

// Re-export public API
pub use column::{ColumnConfig, FilterVariant};
pub use config::{ColumnFilterState, FilterState, TableConfig};
pub use error::{FilterError, Result};
pub use facet::FacetCounts;
pub use filter::{FilterSet, GlobalSearch};
pub use parse::{parse_date, parse_number, parse_value, parse_value_as, ParsedValue, ValueKind};
pub use predicate::{ColumnFilter, Predicate};
pub use range::{
    collate, date_filter_evaluation, matches_expression, range_filter, range_filter_as,
    split_bounds,
};
pub use traits::Filterable;
pub use value::{Number, Timestamp, Value};
