//! Conversions between `rusqlite` rows and the viewer's typed values.

use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::{Value as SqlValue, ValueRef};
use sqlite_viewer_core::{QueryParam, ResultSet, Row, Value};

/// Copies a borrowed SQLite value into an owned [`Value`].
///
/// Text that is not valid UTF-8 is decoded lossily.
pub(crate) fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// Converts bound parameters into values `rusqlite` can bind.
pub(crate) fn params_to_sql(params: &[QueryParam]) -> Vec<SqlValue> {
    params
        .iter()
        .map(|param| match param {
            QueryParam::Text(text) => SqlValue::Text(text.clone()),
            QueryParam::Integer(v) => SqlValue::Integer(*v),
        })
        .collect()
}

/// Column names reported by a prepared statement.
pub(crate) fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(str::to_owned).collect()
}

/// Runs a prepared query and collects every row into a [`ResultSet`].
pub(crate) fn collect_rows(
    stmt: &mut Statement<'_>,
    params: &[SqlValue],
) -> rusqlite::Result<ResultSet> {
    let columns = column_names(stmt);
    let shared: Vec<Arc<str>> = columns.iter().map(|c| Arc::from(c.as_str())).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    while let Some(row) = cursor.next()? {
        let mut cells = Vec::with_capacity(shared.len());
        for (idx, name) in shared.iter().enumerate() {
            cells.push((Arc::clone(name), value_from_ref(row.get_ref(idx)?)));
        }
        rows.push(Row::new(cells));
    }

    Ok(ResultSet { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_value_from_ref_covers_storage_classes() {
        assert_eq!(value_from_ref(ValueRef::Null), Value::Null);
        assert_eq!(value_from_ref(ValueRef::Integer(4)), Value::Integer(4));
        assert_eq!(value_from_ref(ValueRef::Real(0.5)), Value::Real(0.5));
        assert_eq!(value_from_ref(ValueRef::Text(b"hi")), Value::from("hi"));
        assert_eq!(value_from_ref(ValueRef::Blob(&[1, 2])), Value::Blob(vec![1, 2]));
    }

    #[test]
    fn test_collect_rows_binds_params() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ? AS a, ? AS b").unwrap();
        let params = params_to_sql(&[QueryParam::Text("x".into()), QueryParam::Integer(7)]);
        let set = collect_rows(&mut stmt, &params).unwrap();
        assert_eq!(set.columns, ["a", "b"]);
        assert_eq!(set.rows[0].get(0), Some(&Value::from("x")));
        assert_eq!(set.rows[0].get_by_name("b"), Some(&Value::Integer(7)));
    }
}
