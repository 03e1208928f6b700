//! End-to-end tests over JSON table rows.

use serde_json::{json, Value as Json};
use tabula_filter::{
    date_filter_evaluation, parse_date, parse_value, parse_value_as, range_filter, ColumnConfig,
    FilterError, FilterSet, FilterState, FilterVariant, Filterable, Number, ParsedValue,
    TableConfig, Value, ValueKind,
};

// ============================================================================
// Fixtures
// ============================================================================

fn commits() -> Vec<Json> {
    vec![
        json!({"hash": "a1", "author": "ada", "message": "fix parser crash", "value": 150, "date": "2024-03-01", "status": "success"}),
        json!({"hash": "b2", "author": "bob", "message": "add range facets", "value": 320, "date": "2024-07-19", "status": "failed"}),
        json!({"hash": "c3", "author": "cy", "message": "fix typo", "value": 90, "date": "2023-12-24", "status": "success"}),
        json!({"hash": "d4", "author": "ada", "message": "refactor config", "value": 180, "date": "2024-11-02", "status": "pending"}),
        json!({"hash": "e5", "author": "bob", "message": "bump deps", "value": 210, "date": "2024-05-05", "status": "success", "reviewer": null}),
    ]
}

fn hashes(rows: &[&Json]) -> Vec<String> {
    rows.iter()
        .map(|row| row["hash"].as_str().unwrap_or_default().to_string())
        .collect()
}

const TABLE_JSON: &str = r#"{
    "columns": [
        {"id": "hash"},
        {"id": "author", "filterVariant": "select"},
        {"id": "message"},
        {"id": "value", "filterVariant": "range", "valueKind": "number"},
        {"id": "date", "filterVariant": "range", "valueKind": "date"},
        {"id": "status", "filterVariant": "multi-select"}
    ]
}"#;

// ============================================================================
// Normalization and range expressions
// ============================================================================

#[test]
fn normalizes_cells() {
    assert_eq!(
        parse_value(&Value::Number(Number::I64(42))),
        ParsedValue::Number(42.0)
    );
    assert!(parse_value(&Value::String("2024-01-01")).is_date());
    assert_eq!(parse_value(&Value::String("42")), ParsedValue::Number(42.0));
    assert_eq!(parse_value(&Value::String("abc")).as_text(), Some("abc"));
    assert_eq!(
        parse_value_as(&Value::String("2024"), ValueKind::Number),
        ParsedValue::Number(2024.0)
    );
}

#[test]
fn range_expressions() {
    let n = |v: i64| Value::Number(Number::I64(v));
    assert!(range_filter(&n(150), &["100-200"]));
    assert!(!range_filter(&n(250), &["100-200"]));
    assert!(range_filter(&n(150), &["100-200", "300-400"]));
    assert!(range_filter(&Value::String("hello"), &["1-10"]));
    assert!(range_filter(&Value::String("banana"), &["apple-cherry"]));
}

#[test]
fn date_ranges() {
    let june = parse_date("2024-06-15").unwrap();
    let new_year = parse_date("2025-01-01").unwrap();
    assert!(date_filter_evaluation("2024-01-01 to 2024-12-31", june));
    assert!(!date_filter_evaluation("2024-01-01 to 2024-12-31", new_year));
    assert!(!date_filter_evaluation("2024-12-31 to 2024-01-01", june));
}

// ============================================================================
// Filtering JSON rows
// ============================================================================

#[test]
fn filters_json_rows() {
    let rows = commits();
    let filters = FilterSet::new()
        .range("value", ["100-200", "300-400"])
        .range("date", ["2024-01-01 to 2024-12-31"]);
    let results = filters.filter(&rows, Json::accessor);
    assert_eq!(hashes(&results), vec!["a1", "b2", "d4"]);
}

#[test]
fn text_ranges_on_json_rows() {
    let rows = commits();

    // only "fix typo" is at most eight characters long
    let short = FilterSet::new().range("message", ["1-8"]);
    assert_eq!(hashes(&short.filter(&rows, Json::accessor)), vec!["c3"]);

    let authors = FilterSet::new().range("author", ["ada-bob"]);
    assert_eq!(authors.count(&rows, Json::accessor), 4);
}

#[test]
fn missing_and_null_cells_never_match() {
    let rows = commits();
    let reviewer = FilterSet::new().range("reviewer", ["a-z"]);
    assert_eq!(reviewer.count(&rows, Json::accessor), 0);

    let empty = FilterSet::new().multi_select("reviewer", [""]);
    assert_eq!(empty.count(&rows, Json::accessor), 0);
}

#[test]
fn global_search_and_columns_combine() {
    let rows = commits();
    let filters = FilterSet::new().global_search("FIX", ["message"]);
    assert_eq!(hashes(&filters.filter(&rows, Json::accessor)), vec!["a1", "c3"]);

    let filters = filters.range("value", ["100-200"]);
    assert_eq!(hashes(&filters.filter(&rows, Json::accessor)), vec!["a1"]);
}

// ============================================================================
// Facets
// ============================================================================

#[test]
fn range_facets_intersect_other_filters() {
    let rows = commits();
    let value = ColumnConfig::new("value").variant(FilterVariant::Range);
    let filters = FilterSet::new()
        .range("value", ["0-100"])
        .multi_select("status", ["success", "pending"])
        .range("date", ["2024-01-01 to 2024-12-31"]);

    let options = ["0-100", "100-200", "200-300", "300-400"];
    let counts = filters.facet_counts(&rows, &value, &options, Json::accessor);
    assert_eq!(counts.get("0-100"), Some(0));
    assert_eq!(counts.get("100-200"), Some(2));
    assert_eq!(counts.get("200-300"), Some(1));
    assert_eq!(counts.get("300-400"), Some(0));

    // the own predicate does not change the counts
    let lifted = filters.without("value");
    assert_eq!(
        lifted.facet_counts(&rows, &value, &options, Json::accessor),
        counts
    );
}

#[test]
fn categorical_facets_intersect_other_filters() {
    let rows = commits();
    let status = ColumnConfig::new("status").variant(FilterVariant::MultiSelect);
    let filters = FilterSet::new()
        .range("value", ["100-250"])
        .multi_select("status", ["failed"]);

    let counts = filters.facet_counts(
        &rows,
        &status,
        &["success", "failed", "pending"],
        Json::accessor,
    );
    assert_eq!(counts.get("success"), Some(2));
    assert_eq!(counts.get("failed"), Some(0));
    assert_eq!(counts.get("pending"), Some(1));
}

#[test]
fn facet_counts_serialize_in_option_order() {
    let rows = commits();
    let status = ColumnConfig::new("status").variant(FilterVariant::MultiSelect);
    let counts =
        FilterSet::new().facet_counts(&rows, &status, &["pending", "success"], Json::accessor);
    assert_eq!(
        serde_json::to_value(&counts).unwrap(),
        json!({"counts": [["pending", 1], ["success", 3]]})
    );
}

#[test]
fn unique_values_and_bounds() {
    let rows = commits();
    let filters = FilterSet::new().multi_select("status", ["success"]);

    let authors = filters.unique_values(&rows, "author", Json::accessor);
    assert_eq!(authors.get("ada"), Some(&1));
    assert_eq!(authors.get("bob"), Some(&1));
    assert_eq!(authors.get("cy"), Some(&1));

    let value = ColumnConfig::new("value").variant(FilterVariant::Range);
    assert_eq!(
        filters.min_max(&rows, &value, Json::accessor),
        Some((90.0, 210.0))
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn json_state_resolves_against_table() {
    let table = TableConfig::from_json(TABLE_JSON).unwrap();
    let state = FilterState::from_json(
        r#"{
            "columnFilters": [
                {"id": "value", "value": ["100-200", "300-400"]},
                {"id": "date", "value": "2024-01-01 to 2024-12-31"},
                {"id": "status", "value": ["success", "failed"]}
            ]
        }"#,
    )
    .unwrap();

    let filters = table.resolve(&state).unwrap();
    assert_eq!(filters.len(), 3);
    assert_eq!(filters.get("date").map(|f| f.kind), Some(ValueKind::Date));

    let rows = commits();
    assert_eq!(hashes(&filters.filter(&rows, Json::accessor)), vec!["a1", "b2"]);

    let expected = FilterSet::new()
        .range_as("value", ["100-200", "300-400"], ValueKind::Number)
        .range_as("date", ["2024-01-01 to 2024-12-31"], ValueKind::Date)
        .multi_select("status", ["success", "failed"]);
    assert_eq!(
        expected.count(&rows, Json::accessor),
        filters.count(&rows, Json::accessor)
    );
}

#[test]
fn yaml_state_with_global_filter() {
    let table = TableConfig::from_json(TABLE_JSON).unwrap();
    let state = FilterState::from_yaml(
        r#"
columnFilters:
  - id: author
    value: ada
globalFilter: config
"#,
    )
    .unwrap();

    let filters = table.resolve(&state).unwrap();
    let rows = commits();
    assert_eq!(hashes(&filters.filter(&rows, Json::accessor)), vec!["d4"]);
}

#[test]
fn unknown_column_in_state_errors() {
    let table = TableConfig::from_json(TABLE_JSON).unwrap();
    let state =
        FilterState::from_json(r#"{"columnFilters": [{"id": "branch", "value": "main"}]}"#).unwrap();
    let err = table.resolve(&state).unwrap_err();
    assert!(matches!(err, FilterError::UnknownColumn(ref id) if id == "branch"));
}
