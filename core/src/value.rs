//! Typed cell values, rows and result sets.
//!
//! Rows are ordered `(column, value)` pairs so they can be read by position
//! (grid rendering, CSV export) or by column name. Column names are shared
//! between all rows of a [`ResultSet`] through an `Arc<str>`.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A single SQLite value, tagged by storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text shown in a result grid.
    ///
    /// `NULL` is spelled out and blobs collapse to a size placeholder.
    pub fn display(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Blob(bytes) => blob_placeholder(bytes.len()),
            other => other.to_string(),
        }
    }

    /// Text written into an exported CSV cell.
    ///
    /// Unlike [`display`](Self::display), `NULL` becomes an empty cell.
    pub fn export_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Blob(bytes) => blob_placeholder(bytes.len()),
            other => other.to_string(),
        }
    }
}

fn blob_placeholder(len: usize) -> String {
    format!("[BLOB {len} bytes]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(v) => write!(f, "{v}"),
            // Whole reals keep their `.0` so they read differently from integers.
            Value::Real(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Blob(bytes) => f.write_str(&blob_placeholder(bytes.len())),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Real(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Blob(bytes) => serializer.serialize_str(&blob_placeholder(bytes.len())),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One result row as an ordered sequence of `(column, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<(Arc<str>, Value)>,
}

impl Row {
    /// Creates a row from pre-paired cells.
    pub fn new(cells: Vec<(Arc<str>, Value)>) -> Self {
        Self { cells }
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index).map(|(_, value)| value)
    }

    /// Value of the first cell whose column is named `column`.
    pub fn get_by_name(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name.as_ref() == column)
            .map(|(_, value)| value)
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_ref(), value))
    }

    /// Iterates over the values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|(_, value)| value)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name.as_ref(), value)?;
        }
        map.end()
    }
}

/// Column headers plus the rows returned by a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Builds a result set from headers and positional rows.
    ///
    /// Each positional row is zipped with the headers; surplus values beyond
    /// the header count are dropped.
    pub fn from_values(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let shared: Vec<Arc<str>> = columns.iter().map(|c| Arc::from(c.as_str())).collect();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(shared.iter().cloned().zip(values).collect()))
            .collect();
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
