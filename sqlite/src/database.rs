//! The database handle and the verbatim SQL editor path.
//!
//! [`Database`] owns one `rusqlite` connection. Generated statements go
//! through [`Database::run`] with their bound parameters; text typed by the
//! user goes through [`Database::execute_sql`] untouched.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection, OpenFlags};
use serde::Serialize;
use sqlite_viewer_core::{BuiltQuery, ResultSet};
use tracing::{debug, info, warn};

use crate::convert;
use crate::error::{Result, SqliteError};

/// What a block of user SQL produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SqlOutcome {
    /// The input contained no statements.
    Empty,
    /// The last statement returned columns; these are its rows.
    Rows(ResultSet),
    /// The last statement returned no columns; rows changed by all
    /// non-query statements in the block.
    Affected { rows: usize },
}

/// Result of [`Database::execute_sql`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlExecution {
    pub outcome: SqlOutcome,
    /// Number of statements executed.
    pub statements: usize,
    /// Whether any statement could have changed data or schema.
    pub modified: bool,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SqlExecution {
    /// Returns `true` if any statement could have changed data or schema.
    pub fn modified(&self) -> bool {
        self.modified
    }
}

/// An open SQLite database file.
///
/// # Examples
///
/// ```no_run
/// use sqlite_viewer_sqlite::Database;
///
/// let db = Database::open("shop.db").unwrap();
/// for table in db.list_tables().unwrap() {
///     println!("{table}: {} rows", db.count_rows(&table).unwrap());
/// }
/// ```
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens an existing database file for reading and writing.
    ///
    /// The file is probed once so that a missing file or a file that is not
    /// an SQLite database fails here rather than on the first query.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::EngineError`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let engine_error = |source| SqliteError::EngineError {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(path, flags).map_err(engine_error)?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(engine_error)?;

        info!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| SqliteError::EngineError {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self { conn, path: None })
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, reporting any error from SQLite.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        match self.conn.close() {
            Ok(()) => {
                debug!(path = ?path, "closed database");
                Ok(())
            }
            Err((_conn, err)) => {
                warn!(path = ?path, error = %err, "failed to close database cleanly");
                Err(SqliteError::QueryError(err))
            }
        }
    }

    /// Runs a generated query and collects its rows.
    pub fn run(&self, query: &BuiltQuery) -> Result<ResultSet> {
        debug!(sql = %query.sql, params = query.params.len(), "executing query");
        let mut stmt = self.conn.prepare(&query.sql)?;
        let params = convert::params_to_sql(&query.params);
        Ok(convert::collect_rows(&mut stmt, &params)?)
    }

    /// Runs user-typed SQL verbatim, one statement at a time.
    ///
    /// No identifier quoting or rewriting happens here: multi-statement
    /// scripts and DDL are passed to SQLite as typed. Statements that
    /// return columns replace the current result; other statements add to
    /// the affected-row count. Execution stops at the first failing
    /// statement; statements before it stay applied.
    pub fn execute_sql(&self, sql: &str) -> Result<SqlExecution> {
        let started = Instant::now();
        let mut outcome = SqlOutcome::Empty;
        let mut statements = 0;
        let mut affected = 0;
        let mut modified = false;

        let mut batch = Batch::new(&self.conn, sql);
        while let Some(mut stmt) = batch.next()? {
            statements += 1;
            modified |= !stmt.readonly() || stmt.column_count() == 0;
            if stmt.column_count() > 0 {
                outcome = SqlOutcome::Rows(convert::collect_rows(&mut stmt, &[])?);
            } else {
                // sqlite3_changes() is not reset by DDL; count the delta instead.
                let before = self.conn.total_changes();
                stmt.execute([])?;
                affected += (self.conn.total_changes() - before) as usize;
                outcome = SqlOutcome::Affected { rows: affected };
            }
        }

        let elapsed = started.elapsed();
        debug!(statements, ?elapsed, "executed user sql");
        Ok(SqlExecution {
            outcome,
            statements,
            modified,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlite_viewer_core::Value;

    #[test]
    fn test_open_missing_file_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Database::open(dir.path().join("missing.db"))
            .err()
            .expect("opening a missing file must fail");
        assert!(matches!(err, SqliteError::EngineError { .. }));
    }

    #[test]
    fn test_open_non_database_file_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "this is not a database file, just some plain text").unwrap();
        let err = Database::open(&path).err().expect("garbage file must fail");
        assert!(matches!(err, SqliteError::EngineError { .. }));
    }

    #[test]
    fn test_execute_sql_empty_input() {
        let db = Database::open_in_memory().unwrap();
        let exec = db.execute_sql("   ").unwrap();
        assert_eq!(exec.outcome, SqlOutcome::Empty);
        assert_eq!(exec.statements, 0);
    }

    #[test]
    fn test_execute_sql_multi_statement_script() {
        let db = Database::open_in_memory().unwrap();
        let exec = db
            .execute_sql(
                "CREATE TABLE t (x INTEGER);
                 INSERT INTO t VALUES (1), (2);
                 INSERT INTO t VALUES (3);",
            )
            .unwrap();
        assert_eq!(exec.statements, 3);
        assert_eq!(exec.outcome, SqlOutcome::Affected { rows: 3 });
        assert!(exec.modified());

        let exec = db.execute_sql("SELECT x FROM t ORDER BY x DESC").unwrap();
        let SqlOutcome::Rows(set) = exec.outcome else {
            panic!("expected rows");
        };
        assert_eq!(set.columns, ["x"]);
        assert_eq!(set.rows[0].get(0), Some(&Value::Integer(3)));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_execute_sql_is_not_rewritten() {
        let db = Database::open_in_memory().unwrap();
        db.execute_sql("CREATE TABLE \"Order\" (\"Group\" TEXT)").unwrap();
        let err = db.execute_sql("SELECT Group FROM Order").unwrap_err();
        assert!(matches!(err, SqliteError::QueryError(_)));
    }

    #[test]
    fn test_execute_sql_pragma_with_rows() {
        let db = Database::open_in_memory().unwrap();
        let exec = db.execute_sql("PRAGMA user_version").unwrap();
        assert!(matches!(exec.outcome, SqlOutcome::Rows(_)));
        assert!(!db.execute_sql("SELECT 1").unwrap().modified());
    }

    #[test]
    fn test_execute_sql_ddl_after_dml_adds_no_rows() {
        let db = Database::open_in_memory().unwrap();
        db.execute_sql("CREATE TABLE t (x INTEGER)").unwrap();
        let exec = db
            .execute_sql("INSERT INTO t VALUES (1), (2); CREATE TABLE u (y);")
            .unwrap();
        assert_eq!(exec.outcome, SqlOutcome::Affected { rows: 2 });

        let exec = db.execute_sql("CREATE TABLE v (z); DROP TABLE v;").unwrap();
        assert_eq!(exec.outcome, SqlOutcome::Affected { rows: 0 });
    }

    #[test]
    fn test_execute_sql_modified_when_query_comes_last() {
        let db = Database::open_in_memory().unwrap();
        let exec = db.execute_sql("CREATE TABLE b (y); SELECT 1;").unwrap();
        assert!(matches!(exec.outcome, SqlOutcome::Rows(_)));
        assert!(exec.modified());
    }
}
