//! Table browsing: paged fetches, row counts and multi-column search.

use sqlite_viewer_core::{RowLimit, ResultSet, SortState, count_rows, search_rows, select_rows};

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Fetches up to `limit` rows of `table`, optionally ordered.
    pub fn fetch_rows(
        &self,
        table: &str,
        sort: Option<&SortState>,
        limit: RowLimit,
    ) -> Result<ResultSet> {
        self.run(&select_rows(table, sort, limit)?)
    }

    /// Total number of rows in `table`.
    pub fn count_rows(&self, table: &str) -> Result<i64> {
        let query = count_rows(table)?;
        let count = self
            .connection()
            .query_row(&query.sql, [], |row| row.get::<_, i64>(0))?;
        Ok(count)
    }

    /// Rows of `table` where any of `columns` contains `term`.
    ///
    /// Matching uses SQLite's `LIKE`, which is case-insensitive for ASCII.
    pub fn search<S: AsRef<str>>(
        &self,
        table: &str,
        columns: &[S],
        term: &str,
        limit: RowLimit,
    ) -> Result<ResultSet> {
        self.run(&search_rows(table, columns, term, limit)?)
    }
}
