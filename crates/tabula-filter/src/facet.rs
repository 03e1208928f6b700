//! Facet counts.
//!
//! Facets answer "how many rows would remain if this option were picked",
//! with every other column's filter still applied but the column's own
//! filter lifted. Lifting the own filter keeps counts stable while the user
//! toggles options of the same column.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::column::ColumnConfig;
use crate::filter::FilterSet;
use crate::parse::{parse_value_as, ParsedValue};
use crate::range::range_filter_as;
use crate::value::Value;

/// Per-option row counts, in option order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    counts: Vec<(String, usize)>,
}

impl FacetCounts {
    /// Count for an option value; `None` if it was not requested.
    pub fn get(&self, value: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, count)| *count)
    }

    /// Iterates `(option, count)` pairs in option order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(v, count)| (v.as_str(), *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FilterSet {
    /// Rows satisfying every active filter except the one on `column`.
    pub fn masked_rows<'a, T, F>(&self, items: &'a [T], column: &str, accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let masked = self.without(column);
        items
            .iter()
            .filter(|item| masked.matches(*item, &accessor))
            .collect()
    }

    /// Counts rows per option for a column's filter UI.
    ///
    /// Counts are taken over the rows passing every other active filter.
    /// Range columns count rows whose cell satisfies the option as a single
    /// range expression; other columns count rows whose cell text equals
    /// the option. Zero counts are kept.
    ///
    /// ```
    /// use serde_json::json;
    /// use tabula_filter::{ColumnConfig, FilterSet, FilterVariant, Filterable};
    ///
    /// let rows = vec![
    ///     json!({"value": 150, "status": "success"}),
    ///     json!({"value": 250, "status": "success"}),
    ///     json!({"value": 120, "status": "failed"}),
    /// ];
    /// let value = ColumnConfig::new("value").variant(FilterVariant::Range);
    /// let filters = FilterSet::new()
    ///     .range("value", ["100-200"])
    ///     .multi_select("status", ["success"]);
    ///
    /// let counts = filters.facet_counts(&rows, &value, &["100-200", "200-300"], serde_json::Value::accessor);
    /// assert_eq!(counts.get("100-200"), Some(1));
    /// assert_eq!(counts.get("200-300"), Some(1));
    /// ```
    pub fn facet_counts<T, F, S>(
        &self,
        items: &[T],
        column: &ColumnConfig,
        options: &[S],
        accessor: F,
    ) -> FacetCounts
    where
        S: AsRef<str>,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let rows = self.masked_rows(items, &column.id, &accessor);

        let counts: Vec<(String, usize)> = if column.is_range() {
            options
                .iter()
                .map(|option| {
                    let option = option.as_ref();
                    let count = rows
                        .iter()
                        .filter(|row| {
                            range_filter_as(&accessor(**row, &column.id), &[option], column.value_kind)
                        })
                        .count();
                    (option.to_string(), count)
                })
                .collect()
        } else {
            let facets = unique_counts(&rows, &column.id, &accessor);
            options
                .iter()
                .map(|option| {
                    let option = option.as_ref();
                    (option.to_string(), facets.get(option).copied().unwrap_or(0))
                })
                .collect()
        };

        tracing::debug!(
            column = %column.id,
            variant = %column.effective_variant(),
            rows = items.len(),
            masked = rows.len(),
            options = options.len(),
            "computed facet counts"
        );

        FacetCounts { counts }
    }

    /// Distinct cell texts of a column with their row counts.
    ///
    /// Taken over the rows passing every other active filter; missing cells
    /// are skipped.
    pub fn unique_values<T, F>(&self, items: &[T], column: &str, accessor: F) -> BTreeMap<String, usize>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let rows = self.masked_rows(items, column, &accessor);
        unique_counts(&rows, column, &accessor)
    }

    /// Smallest and largest numeric value of a column.
    ///
    /// Taken over the rows passing every other active filter. Cells that do
    /// not normalize to a number are skipped; `None` if none do.
    pub fn min_max<T, F>(&self, items: &[T], column: &ColumnConfig, accessor: F) -> Option<(f64, f64)>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.masked_rows(items, &column.id, &accessor)
            .into_iter()
            .filter_map(|row| match parse_value_as(&accessor(row, &column.id), column.value_kind) {
                ParsedValue::Number(n) => Some(n),
                _ => None,
            })
            .fold(None, |acc, n| match acc {
                None => Some((n, n)),
                Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
            })
    }
}

fn unique_counts<T, F>(rows: &[&T], column: &str, accessor: &F) -> BTreeMap<String, usize>
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    let mut counts = BTreeMap::new();
    for row in rows {
        let cell = accessor(*row, column);
        if cell.is_missing() {
            continue;
        }
        *counts.entry(cell.to_text().into_owned()).or_insert(0) += 1;
    }
    counts
}
