//! Filter set builder and executor.
//!
//! A [`FilterSet`] holds the active filter of each column plus an optional
//! global search, and runs them against row collections.

use crate::parse::ValueKind;
use crate::predicate::{contains_ignore_case, ColumnFilter, Predicate};
use crate::value::Value;

/// Active column filters for one table.
///
/// A row matches when it satisfies every column filter and, if a global
/// search is set, contains the search text in at least one searched column:
///
/// ```text
/// match = (all column filters match) ∧ (global search matches, or none set)
/// ```
///
/// # Example
///
/// ```
/// use tabula_filter::{FilterSet, Number, Value};
///
/// struct Commit {
///     author: String,
///     value: i64,
///     status: String,
/// }
///
/// fn accessor<'a>(c: &'a Commit, column: &str) -> Value<'a> {
///     match column {
///         "author" => Value::String(&c.author),
///         "value" => Value::Number(Number::I64(c.value)),
///         "status" => Value::String(&c.status),
///         _ => Value::None,
///     }
/// }
///
/// let commits = vec![
///     Commit { author: "ada".into(), value: 150, status: "success".into() },
///     Commit { author: "bob".into(), value: 250, status: "success".into() },
///     Commit { author: "cy".into(), value: 120, status: "failed".into() },
/// ];
///
/// let filters = FilterSet::new()
///     .range("value", ["100-200"])
///     .multi_select("status", ["success"]);
///
/// let rows = filters.filter(&commits, accessor);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].author, "ada");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<ColumnFilter>,
    global: Option<GlobalSearch>,
}

/// Case-insensitive search across several columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSearch {
    /// Text to look for.
    pub needle: String,
    /// Columns searched.
    pub columns: Vec<String>,
}

impl GlobalSearch {
    /// Tests a row: any searched column containing the needle matches.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.columns.iter().any(|column| {
            let cell = accessor(item, column);
            !cell.is_missing() && contains_ignore_case(&cell.to_text(), &self.needle)
        })
    }
}

impl FilterSet {
    /// Creates an empty filter set, which matches every row.
    pub fn new() -> Self {
        FilterSet::default()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Sets the filter of a column, replacing any earlier one.
    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.insert(filter);
        self
    }

    /// Sets the filter of a column in place, replacing any earlier one.
    pub fn insert(&mut self, filter: ColumnFilter) {
        match self.filters.iter_mut().find(|f| f.column == filter.column) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// Adds a range filter.
    pub fn range<I, S>(self, column: &str, expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(ColumnFilter::range(column, expressions))
    }

    /// Adds a range filter normalizing cells with a declared kind.
    pub fn range_as<I, S>(self, column: &str, expressions: I, kind: ValueKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(ColumnFilter::range(column, expressions).with_kind(kind))
    }

    /// Adds a set-membership filter.
    pub fn multi_select<I, S>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(ColumnFilter::multi_select(column, values))
    }

    /// Adds an equality filter.
    pub fn select(self, column: &str, value: impl Into<String>) -> Self {
        self.with_filter(ColumnFilter::select(column, value))
    }

    /// Adds a substring filter.
    pub fn text(self, column: &str, needle: impl Into<String>) -> Self {
        self.with_filter(ColumnFilter::text(column, needle))
    }

    /// Sets the global search. An empty needle clears it.
    pub fn global_search<I, S>(mut self, needle: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let needle = needle.into();
        self.global = if needle.is_empty() {
            None
        } else {
            Some(GlobalSearch {
                needle,
                columns: columns.into_iter().map(Into::into).collect(),
            })
        };
        self
    }

    /// Removes the filter of a column.
    pub fn remove(&mut self, column: &str) -> Option<ColumnFilter> {
        let index = self.filters.iter().position(|f| f.column == column)?;
        Some(self.filters.remove(index))
    }

    /// Returns a copy of this set without the filter of `column`.
    ///
    /// Every other column filter and the global search stay applied. This
    /// is the row set facet counts for `column` are computed against.
    pub fn without(&self, column: &str) -> FilterSet {
        FilterSet {
            filters: self
                .filters
                .iter()
                .filter(|f| f.column != column)
                .cloned()
                .collect(),
            global: self.global.clone(),
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the active column filters.
    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    /// Returns the filter of a column, if active.
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.iter().find(|f| f.column == column)
    }

    /// Returns the predicate of a column, if active.
    pub fn predicate(&self, column: &str) -> Option<&Predicate> {
        self.get(column).map(|f| &f.predicate)
    }

    /// Returns the global search, if set.
    pub fn global(&self) -> Option<&GlobalSearch> {
        self.global.as_ref()
    }

    /// Ids of the columns with an active filter.
    pub fn active_columns(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.column.as_str())
    }

    /// Number of active column filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if nothing is filtered (matches every row).
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.global.is_none()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single row matches every filter.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let columns_pass = self
            .filters
            .iter()
            .all(|filter| filter.matches(&accessor(item, &filter.column)));

        if !columns_pass {
            return false;
        }

        match &self.global {
            Some(search) => search.matches(item, &accessor),
            None => true,
        }
    }

    /// Filters a slice, returning references to matching rows in order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let results: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();
        tracing::debug!(
            filters = self.filters.len(),
            rows = items.len(),
            matched = results.len(),
            "filtered rows"
        );
        results
    }

    /// Filters and clones matching rows.
    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F) -> Vec<T>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.filter(items, accessor).into_iter().cloned().collect()
    }

    /// Filters a vector in place, keeping only matching rows.
    pub fn filter_mut<T, F>(&self, items: &mut Vec<T>, accessor: F)
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.retain(|item| self.matches(item, &accessor));
    }

    /// Counts the matching rows.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    /// Returns `true` if any row matches.
    pub fn any<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().any(|item| self.matches(item, &accessor))
    }

    /// Returns `true` if all rows match.
    pub fn all<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().all(|item| self.matches(item, &accessor))
    }

    /// Finds the first matching row.
    pub fn find<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items.iter().find(|item| self.matches(*item, &accessor))
    }

    /// Finds the index of the first matching row.
    pub fn position<T, F>(&self, items: &[T], accessor: F) -> Option<usize>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().position(|item| self.matches(item, &accessor))
    }
}
