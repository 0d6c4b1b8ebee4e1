//! Schema introspection: tables, columns, indexes, foreign keys and the
//! stored `CREATE` statements.
//!
//! Table names are interpolated into `PRAGMA` statements through
//! [`quote_identifier`](sqlite_viewer_core::quote_identifier); lookups in
//! `sqlite_master` bind the name as a value instead.

use serde::Serialize;
use sqlite_viewer_core::{foreign_key_list, index_list, table_info};

use crate::database::Database;
use crate::error::Result;

/// One column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    /// Declared type, empty when the column was declared without one.
    pub decl_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// 1-based position in the primary key, 0 if not part of it.
    pub primary_key: i64,
}

/// One index as reported by `PRAGMA index_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub unique: bool,
    /// `c` for `CREATE INDEX`, `u` for `UNIQUE` constraints, `pk` for
    /// primary keys.
    pub origin: String,
    pub partial: bool,
}

/// One foreign key column mapping as reported by `PRAGMA foreign_key_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyInfo {
    pub id: i64,
    pub seq: i64,
    pub table: String,
    pub from: String,
    /// Referenced column; `None` when the key targets the parent's primary key.
    pub to: Option<String>,
    pub on_update: String,
    pub on_delete: String,
}

/// Counts shown under a table's `CREATE` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub columns: usize,
    pub rows: i64,
    pub indexes: usize,
    pub foreign_keys: usize,
}

impl TableSummary {
    /// Renders the summary as SQL comment lines for the schema view.
    ///
    /// Index and foreign key counts are omitted when zero.
    pub fn to_comment_block(&self) -> String {
        let mut lines = vec![
            "-- Table info --".to_string(),
            format!("Columns: {}", self.columns),
            format!("Rows: {}", self.rows),
        ];
        if self.indexes > 0 {
            lines.push(format!("Indexes: {}", self.indexes));
        }
        if self.foreign_keys > 0 {
            lines.push(format!("Foreign keys: {}", self.foreign_keys));
        }
        lines.join("\n")
    }
}

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const ALL_CREATE_SQL: &str = "SELECT name, sql FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const CREATE_SQL: &str = "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1";

impl Database {
    /// Lists user tables in name order, skipping SQLite's internal tables.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.connection().prepare(LIST_TABLES_SQL)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Returns `true` if a user table named `table` exists.
    pub fn has_table(&self, table: &str) -> Result<bool> {
        Ok(self.list_tables()?.iter().any(|t| t == table))
    }

    /// Column definitions of `table`, in declaration order.
    ///
    /// An unknown table yields an empty list, as SQLite does.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.connection().prepare(&table_info(table)?)?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_value: row.get(4)?,
                    primary_key: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Column names of `table`, in declaration order.
    pub fn column_names(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.columns(table)?.into_iter().map(|c| c.name).collect())
    }

    /// The stored `CREATE TABLE` text for `table`, if any.
    pub fn create_statement(&self, table: &str) -> Result<Option<String>> {
        let mut stmt = self.connection().prepare(CREATE_SQL)?;
        let mut rows = stmt.query([table])?;
        match rows.next()? {
            Some(row) => Ok(row.get::<_, Option<String>>(0)?),
            None => Ok(None),
        }
    }

    /// `(name, CREATE text)` for every user table that has stored SQL.
    pub fn all_create_statements(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.connection().prepare(ALL_CREATE_SQL)?;
        let pairs = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pairs
            .into_iter()
            .filter_map(|(name, sql)| sql.map(|sql| (name, sql)))
            .collect())
    }

    /// Indexes defined on `table`.
    pub fn indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        let mut stmt = self.connection().prepare(&index_list(table)?)?;
        let indexes = stmt
            .query_map([], |row| {
                Ok(IndexInfo {
                    name: row.get(1)?,
                    unique: row.get::<_, i64>(2)? != 0,
                    origin: row.get(3)?,
                    partial: row.get::<_, i64>(4)? != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(indexes)
    }

    /// Foreign key mappings declared on `table`.
    pub fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let mut stmt = self.connection().prepare(&foreign_key_list(table)?)?;
        let keys = stmt
            .query_map([], |row| {
                Ok(ForeignKeyInfo {
                    id: row.get(0)?,
                    seq: row.get(1)?,
                    table: row.get(2)?,
                    from: row.get(3)?,
                    to: row.get(4)?,
                    on_update: row.get(5)?,
                    on_delete: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    /// Column, row, index and foreign key counts for `table`.
    pub fn table_summary(&self, table: &str) -> Result<TableSummary> {
        Ok(TableSummary {
            columns: self.columns(table)?.len(),
            rows: self.count_rows(table)?,
            indexes: self.indexes(table)?.len(),
            foreign_keys: self.foreign_keys(table)?.len(),
        })
    }
}
