//! Row access trait.
//!
//! Filter sets read cells through an accessor function. [`Filterable`]
//! lets a row type provide that function once, and is implemented for
//! schemaless JSON records.

use crate::value::Value;

/// Types whose cells can be read by column id.
///
/// # Example
///
/// ```
/// use tabula_filter::{FilterSet, Filterable, Number, Value};
///
/// struct Todo {
///     title: String,
///     priority: u8,
/// }
///
/// impl Filterable for Todo {
///     fn cell(&self, column: &str) -> Value<'_> {
///         match column {
///             "title" => Value::String(&self.title),
///             "priority" => Value::Number(Number::U64(self.priority as u64)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let todos = vec![
///     Todo { title: "write docs".into(), priority: 2 },
///     Todo { title: "fix bug".into(), priority: 5 },
/// ];
/// let filters = FilterSet::new().range("priority", ["4-5"]);
/// assert_eq!(filters.count(&todos, Todo::accessor), 1);
/// ```
pub trait Filterable {
    /// Returns the cell of a column, or [`Value::None`] if there is no
    /// such column.
    fn cell(&self, column: &str) -> Value<'_>;

    /// Accessor function for [`FilterSet`](crate::FilterSet) execution
    /// methods.
    fn accessor<'a>(item: &'a Self, column: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.cell(column)
    }
}

impl Filterable for serde_json::Map<String, serde_json::Value> {
    fn cell(&self, column: &str) -> Value<'_> {
        self.get(column).map(Value::from).unwrap_or(Value::None)
    }
}

/// Objects are read by key; any other JSON value has no columns.
impl Filterable for serde_json::Value {
    fn cell(&self, column: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.cell(column),
            _ => Value::None,
        }
    }
}
