//! Viewer session: one connection plus the state of the table grid.
//!
//! A [`Session`] is owned by whatever drives the viewer (the CLI shell or a
//! one-shot command). It opens and closes the single database handle and
//! keeps the selected table, sort column, row limit and search text between
//! commands. Every command is a method; no state lives outside the struct.
//!
//! # Example
//!
//! ```no_run
//! use sqlite_viewer_core::RowLimit;
//! use sqlite_viewer_sqlite::Session;
//!
//! let mut session = Session::new(RowLimit::default());
//! session.open("shop.db").unwrap();
//! session.select_table("orders").unwrap();
//! session.sort_by("created_at").unwrap();
//! let page = session.load().unwrap();
//! println!("{} of {:?} rows", page.result.len(), page.total);
//! session.close();
//! ```

use std::path::Path;

use serde::Serialize;
use sqlite_viewer_core::{ResultSet, RowLimit, SortState};
use tracing::{debug, info, warn};

use crate::database::{Database, SqlExecution};
use crate::error::{Result, SqliteError};
use crate::schema::TableSummary;

/// How the rows of a [`GridPage`] were selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    /// Plain (optionally sorted) fetch of the table.
    Browse,
    /// Rows matching the session's search text.
    Search,
}

/// The rows currently shown for the selected table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPage {
    pub table: String,
    pub mode: GridMode,
    /// Sort applied to the fetch; always empty for searches.
    pub sort: SortState,
    pub result: ResultSet,
    /// Total rows in the table; `None` for searches.
    pub total: Option<i64>,
}

impl GridPage {
    /// Status line for the grid, e.g. `Rows: 3 / 3` or `Found: 2`.
    pub fn status(&self) -> String {
        match self.total {
            Some(total) => format!("Rows: {} / {total}", self.result.len()),
            None => format!("Found: {}", self.result.len()),
        }
    }
}

/// A table's stored `CREATE` text plus its summary counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaView {
    pub table: String,
    pub create_sql: Option<String>,
    pub summary: TableSummary,
}

impl SchemaView {
    /// The text shown in the schema view: statement, blank line, summary.
    pub fn to_text(&self) -> String {
        match &self.create_sql {
            Some(sql) => format!("{sql}\n\n{}", self.summary.to_comment_block()),
            None => self.summary.to_comment_block(),
        }
    }
}

/// Renders every table's `CREATE` statement as one script.
pub fn render_all_schemas(schemas: &[(String, String)]) -> String {
    schemas
        .iter()
        .map(|(name, sql)| format!("-- {name} --\n{sql};\n\n"))
        .collect()
}

/// An explicit viewer session with open/close lifecycle.
pub struct Session {
    db: Option<Database>,
    tables: Vec<String>,
    table: Option<String>,
    columns: Vec<String>,
    sort: SortState,
    limit: RowLimit,
    search: String,
    grid: Option<GridPage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RowLimit::default())
    }
}

impl Session {
    /// Creates a closed session with the given row limit.
    pub fn new(limit: RowLimit) -> Self {
        Self {
            db: None,
            tables: Vec::new(),
            table: None,
            columns: Vec::new(),
            sort: SortState::default(),
            limit,
            search: String::new(),
            grid: None,
        }
    }

    /// Opens `path`, closing any database that was open before.
    ///
    /// Loads the table list and selects the first table. Returns the table
    /// names.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::EngineError`] if the file cannot be opened, or
    /// the error from loading its tables. The session is left closed in
    /// either case.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&[String]> {
        self.close();
        let db = Database::open(path)?;
        self.install(db)
    }

    /// Wraps an already open database, e.g. an in-memory one.
    pub fn attach(&mut self, db: Database) -> Result<&[String]> {
        self.close();
        self.install(db)
    }

    fn install(&mut self, db: Database) -> Result<&[String]> {
        self.db = Some(db);
        if let Err(err) = self.refresh_tables().map(|_| ()) {
            self.close();
            return Err(err);
        }
        Ok(&self.tables)
    }

    /// Closes the database and resets all view state except the row limit.
    pub fn close(&mut self) {
        if let Some(db) = self.db.take() {
            let path = db.path().map(Path::to_path_buf);
            if let Err(err) = db.close() {
                warn!(error = %err, "error while closing database");
            }
            info!(path = ?path, "database closed");
        }
        self.tables.clear();
        self.table = None;
        self.columns.clear();
        self.sort.clear();
        self.search.clear();
        self.grid = None;
    }

    /// Returns `true` while a database is open.
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Path of the open database file.
    pub fn path(&self) -> Option<&Path> {
        self.db.as_ref().and_then(Database::path)
    }

    /// The open database.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::NotConnected`] if the session is closed.
    pub fn database(&self) -> Result<&Database> {
        self.db.as_ref().ok_or(SqliteError::NotConnected)
    }

    /// User tables of the open database, as last loaded.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Reloads the table list.
    ///
    /// Keeps the current selection if the table still exists, otherwise
    /// selects the first table (or none).
    pub fn refresh_tables(&mut self) -> Result<&[String]> {
        self.tables = self.database()?.list_tables()?;

        let keep = self
            .table
            .as_ref()
            .filter(|t| self.tables.contains(t))
            .cloned();
        match keep.or_else(|| self.tables.first().cloned()) {
            Some(table) => {
                if self.table.as_ref() != Some(&table) {
                    self.sort.clear();
                    self.grid = None;
                }
                self.columns = self.database()?.column_names(&table)?;
                self.table = Some(table);
            }
            None => {
                self.table = None;
                self.columns.clear();
                self.sort.clear();
                self.grid = None;
            }
        }
        debug!(tables = self.tables.len(), "table list refreshed");
        Ok(&self.tables)
    }

    /// Selects `table` for browsing.
    ///
    /// Switching to a different table clears the sort column.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::UnknownTable`] if no such table exists.
    pub fn select_table(&mut self, table: &str) -> Result<&[String]> {
        if !self.tables.iter().any(|t| t == table) {
            // The list may be stale after user SQL run outside the session.
            self.refresh_tables()?;
            if !self.tables.iter().any(|t| t == table) {
                return Err(SqliteError::UnknownTable(table.to_string()));
            }
        }

        if self.table.as_deref() != Some(table) {
            self.sort.clear();
            self.grid = None;
        }
        self.columns = self.database()?.column_names(table)?;
        self.table = Some(table.to_string());
        Ok(&self.columns)
    }

    /// The selected table, if any.
    pub fn selected_table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Column names of the selected table.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Sets the row limit (clamped) and returns the effective value.
    pub fn set_limit(&mut self, limit: u32) -> RowLimit {
        self.limit = RowLimit::new(limit);
        self.limit
    }

    /// The current row limit.
    pub fn limit(&self) -> RowLimit {
        self.limit
    }

    /// Applies a header click on `column`; see [`SortState::toggle`].
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::UnknownColumn`] if the selected table has no
    /// such column.
    pub fn sort_by(&mut self, column: &str) -> Result<&SortState> {
        self.check_column(column)?;
        self.sort.toggle(column);
        Ok(&self.sort)
    }

    /// Replaces the sort state outright.
    pub fn set_sort(&mut self, sort: SortState) -> Result<&SortState> {
        if let Some(column) = &sort.column {
            self.check_column(column)?;
        }
        self.sort = sort;
        Ok(&self.sort)
    }

    /// The current sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Sets the search text; an empty (or blank) text turns search off.
    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_string();
    }

    /// The current search text.
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Loads the grid for the selected table.
    ///
    /// With a search text, rows matching it in any column are returned.
    /// Otherwise the table is fetched in sort order along with its total
    /// row count.
    pub fn load(&mut self) -> Result<&GridPage> {
        let table = self.table.clone().ok_or(SqliteError::NoTableSelected)?;
        let db = self.database()?;

        let page = if self.columns.is_empty() {
            GridPage {
                table,
                mode: GridMode::Browse,
                sort: SortState::default(),
                result: ResultSet::default(),
                total: Some(0),
            }
        } else if !self.search.is_empty() {
            let result = db.search(&table, &self.columns, &self.search, self.limit)?;
            info!(table = %table, found = result.len(), "searched table");
            GridPage {
                table,
                mode: GridMode::Search,
                sort: SortState::default(),
                result,
                total: None,
            }
        } else {
            let sort = match &self.sort.column {
                Some(column) if self.columns.contains(column) => self.sort.clone(),
                _ => SortState::default(),
            };
            let result = db.fetch_rows(&table, Some(&sort), self.limit)?;
            let total = db.count_rows(&table)?;
            info!(table = %table, shown = result.len(), total, "loaded table");
            GridPage {
                table,
                mode: GridMode::Browse,
                sort,
                result,
                total: Some(total),
            }
        };

        Ok(&*self.grid.insert(page))
    }

    /// The grid as last loaded.
    pub fn grid(&self) -> Option<&GridPage> {
        self.grid.as_ref()
    }

    /// The grid to export.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::NothingToExport`] if no grid has been loaded
    /// or the loaded grid has no columns or no rows.
    pub fn export_grid(&self) -> Result<&GridPage> {
        match &self.grid {
            Some(page) if !page.result.columns.is_empty() && !page.result.is_empty() => Ok(page),
            _ => Err(SqliteError::NothingToExport),
        }
    }

    /// Schema view for `table`, or for the selected table when `None`.
    pub fn schema(&self, table: Option<&str>) -> Result<SchemaView> {
        let table = match table {
            Some(table) => table.to_string(),
            None => self.table.clone().ok_or(SqliteError::NoTableSelected)?,
        };
        let db = self.database()?;
        if !db.has_table(&table)? {
            return Err(SqliteError::UnknownTable(table));
        }
        Ok(SchemaView {
            create_sql: db.create_statement(&table)?,
            summary: db.table_summary(&table)?,
            table,
        })
    }

    /// Every table's `CREATE` statement as one script.
    pub fn all_schemas(&self) -> Result<String> {
        Ok(render_all_schemas(&self.database()?.all_create_statements()?))
    }

    /// Runs user SQL verbatim.
    ///
    /// After statements that may have changed data or schema, the table
    /// list and the selected table's columns are reloaded.
    pub fn execute_sql(&mut self, sql: &str) -> Result<SqlExecution> {
        let execution = self.database()?.execute_sql(sql)?;
        if execution.modified() {
            self.refresh_tables()?;
        }
        Ok(execution)
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if self.table.is_none() {
            return Err(SqliteError::NoTableSelected);
        }
        if !self.columns.iter().any(|c| c == column) {
            return Err(SqliteError::UnknownColumn(column.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                "CREATE TABLE b (id INTEGER, name TEXT);
                 CREATE TABLE a (x INTEGER);
                 INSERT INTO b VALUES (1, 'one'), (2, 'two');
                 INSERT INTO a VALUES (10);",
            )
            .unwrap();
        let mut session = Session::default();
        session.attach(db).unwrap();
        session
    }

    #[test]
    fn test_closed_session_reports_not_connected() {
        let mut session = Session::default();
        assert!(!session.is_open());
        assert!(matches!(session.load(), Err(SqliteError::NoTableSelected)));
        assert!(matches!(
            session.execute_sql("SELECT 1"),
            Err(SqliteError::NotConnected)
        ));
        assert!(matches!(session.all_schemas(), Err(SqliteError::NotConnected)));
    }

    #[test]
    fn test_attach_selects_first_table() {
        let session = session();
        assert_eq!(session.tables(), ["a", "b"]);
        assert_eq!(session.selected_table(), Some("a"));
        assert_eq!(session.columns(), ["x"]);
    }

    #[test]
    fn test_select_unknown_table_fails() {
        let mut session = session();
        assert!(matches!(
            session.select_table("nope"),
            Err(SqliteError::UnknownTable(_))
        ));
        assert_eq!(session.selected_table(), Some("a"));
    }

    #[test]
    fn test_switching_tables_clears_sort() {
        let mut session = session();
        session.select_table("b").unwrap();
        session.sort_by("name").unwrap();
        session.select_table("a").unwrap();
        assert_eq!(session.sort(), &SortState::default());
    }

    #[test]
    fn test_sort_by_unknown_column_fails() {
        let mut session = session();
        assert!(matches!(
            session.sort_by("name"),
            Err(SqliteError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_load_browse_then_search() {
        let mut session = session();
        session.select_table("b").unwrap();
        session.sort_by("id").unwrap();
        session.sort_by("id").unwrap();

        let page = session.load().unwrap();
        assert_eq!(page.mode, GridMode::Browse);
        assert_eq!(page.total, Some(2));
        assert_eq!(page.status(), "Rows: 2 / 2");
        assert_eq!(page.result.rows[0].get_by_name("name").unwrap().display(), "two");

        session.set_search("ONE");
        let page = session.load().unwrap();
        assert_eq!(page.mode, GridMode::Search);
        assert_eq!(page.status(), "Found: 1");

        session.set_search("  ");
        assert_eq!(session.load().unwrap().mode, GridMode::Browse);
    }

    #[test]
    fn test_export_grid_requires_rows() {
        let mut session = session();
        assert!(matches!(
            session.export_grid(),
            Err(SqliteError::NothingToExport)
        ));
        session.execute_sql("DELETE FROM a").unwrap();
        session.load().unwrap();
        assert!(matches!(
            session.export_grid(),
            Err(SqliteError::NothingToExport)
        ));
    }

    #[test]
    fn test_execute_sql_refreshes_tables_and_keeps_selection() {
        let mut session = session();
        session.select_table("b").unwrap();
        session.execute_sql("CREATE TABLE c (y); ALTER TABLE b ADD COLUMN z").unwrap();
        assert_eq!(session.tables(), ["a", "b", "c"]);
        assert_eq!(session.selected_table(), Some("b"));
        assert_eq!(session.columns(), ["id", "name", "z"]);

        session.execute_sql("DROP TABLE b").unwrap();
        assert_eq!(session.selected_table(), Some("a"));
    }

    #[test]
    fn test_execute_sql_refreshes_when_query_comes_last() {
        let mut session = session();
        session
            .execute_sql("CREATE TABLE c (y); ALTER TABLE a ADD COLUMN z; SELECT 1;")
            .unwrap();
        assert_eq!(session.tables(), ["a", "b", "c"]);
        assert_eq!(session.columns(), ["x", "z"]);
    }

    #[test]
    fn test_failed_table_load_leaves_session_closed() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch("CREATE TABLE \"\" (x INTEGER)")
            .unwrap();
        let mut session = Session::default();
        assert!(matches!(session.attach(db), Err(SqliteError::Core(_))));
        assert!(!session.is_open());
        assert!(session.tables().is_empty());
    }

    #[test]
    fn test_close_resets_state_but_keeps_limit() {
        let mut session = session();
        session.set_limit(5);
        session.set_search("x");
        session.close();
        assert!(!session.is_open());
        assert!(session.tables().is_empty());
        assert_eq!(session.selected_table(), None);
        assert_eq!(session.search_text(), "");
        assert_eq!(session.limit().get(), 5);
    }

    #[test]
    fn test_render_all_schemas() {
        let text = render_all_schemas(&[
            ("a".into(), "CREATE TABLE a (x)".into()),
            ("b".into(), "CREATE TABLE b (y)".into()),
        ]);
        assert_eq!(
            text,
            "-- a --\nCREATE TABLE a (x);\n\n-- b --\nCREATE TABLE b (y);\n\n"
        );
    }
}
