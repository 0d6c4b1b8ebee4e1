//! Parameterized query assembly for table browsing.
//!
//! Every statement built here interpolates only identifier fragments
//! produced by [`quote_identifier`]; row limits and search terms travel as
//! bound parameters in [`BuiltQuery::params`].
//!
//! # Examples
//!
//! ```
//! use sqlite_viewer_core::{QueryParam, RowLimit, SortState, select_rows};
//!
//! let sort = SortState::ascending("Group");
//! let query = select_rows("Order", Some(&sort), RowLimit::new(1000)).unwrap();
//! assert_eq!(query.sql, "SELECT * FROM \"Order\" ORDER BY \"Group\" ASC LIMIT ?");
//! assert_eq!(query.params, vec![QueryParam::Integer(1000)]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::ident::quote_identifier;

/// Row limit used when nothing else is configured.
pub const DEFAULT_LIMIT: u32 = 1000;

/// Upper bound accepted for a row limit.
pub const MAX_LIMIT: u32 = 1_000_000;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryParam {
    Text(String),
    Integer(i64),
}

/// A SQL statement together with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl BuiltQuery {
    fn new(sql: String, params: Vec<QueryParam>) -> Self {
        Self { sql, params }
    }
}

/// Maximum number of rows fetched for a grid, clamped to `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct RowLimit(u32);

impl RowLimit {
    /// Creates a limit, clamping zero up to one and large values down to
    /// [`MAX_LIMIT`].
    pub fn new(limit: u32) -> Self {
        Self(limit.clamp(1, MAX_LIMIT))
    }

    /// The clamped limit.
    pub fn get(self) -> u32 {
        self.0
    }

    fn as_param(self) -> QueryParam {
        QueryParam::Integer(i64::from(self.0))
    }
}

impl Default for RowLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl From<u32> for RowLimit {
    fn from(limit: u32) -> Self {
        Self::new(limit)
    }
}

impl From<RowLimit> for u32 {
    fn from(limit: RowLimit) -> Self {
        limit.0
    }
}

/// Sort direction for an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// SQL keyword for the direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    /// Arrow shown next to a sorted column header.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }

    fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The column a grid is sorted by, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Sort ascending by `column`.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort descending by `column`.
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: SortDirection::Descending,
        }
    }

    /// Applies a header click: the current sort column flips direction, any
    /// other column becomes the new ascending sort.
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.reversed();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    /// Drops the sort column.
    pub fn clear(&mut self) {
        self.column = None;
        self.direction = SortDirection::Ascending;
    }

    /// Direction for `column` if it is the active sort column.
    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        (self.column.as_deref() == Some(column)).then_some(self.direction)
    }
}

/// `SELECT * FROM <table> [ORDER BY <col> ASC|DESC] LIMIT ?`
///
/// # Errors
///
/// Returns [`CoreError::InvalidIdentifier`] if the table or sort column is
/// empty.
pub fn select_rows(table: &str, sort: Option<&SortState>, limit: RowLimit) -> Result<BuiltQuery> {
    let mut sql = format!("SELECT * FROM {}", quote_identifier(table)?);
    if let Some(SortState {
        column: Some(column),
        direction,
    }) = sort
    {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_identifier(column)?,
            direction.as_sql()
        ));
    }
    sql.push_str(" LIMIT ?");
    Ok(BuiltQuery::new(sql, vec![limit.as_param()]))
}

/// `SELECT COUNT(*) FROM <table>`
pub fn count_rows(table: &str) -> Result<BuiltQuery> {
    Ok(BuiltQuery::new(
        format!("SELECT COUNT(*) FROM {}", quote_identifier(table)?),
        Vec::new(),
    ))
}

/// Case-folded `LIKE` operand for a search term: `%term%`.
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim().to_lowercase())
}

/// `SELECT * FROM <table> WHERE <c1> LIKE ? OR … LIMIT ?`
///
/// Binds one `%term%` operand per column followed by the limit.
///
/// # Errors
///
/// Returns [`CoreError::NoSearchColumns`] if `columns` is empty, or
/// [`CoreError::InvalidIdentifier`] for an empty table or column name.
pub fn search_rows<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    term: &str,
    limit: RowLimit,
) -> Result<BuiltQuery> {
    if columns.is_empty() {
        return Err(CoreError::NoSearchColumns);
    }

    let conditions = columns
        .iter()
        .map(|column| quote_identifier(column.as_ref()).map(|c| format!("{c} LIKE ?")))
        .collect::<Result<Vec<_>>>()?
        .join(" OR ");

    let pattern = like_pattern(term);
    let mut params: Vec<QueryParam> = columns
        .iter()
        .map(|_| QueryParam::Text(pattern.clone()))
        .collect();
    params.push(limit.as_param());

    Ok(BuiltQuery::new(
        format!(
            "SELECT * FROM {} WHERE {conditions} LIMIT ?",
            quote_identifier(table)?
        ),
        params,
    ))
}

/// `PRAGMA table_info(<table>)`
pub fn table_info(table: &str) -> Result<String> {
    Ok(format!("PRAGMA table_info({})", quote_identifier(table)?))
}

/// `PRAGMA index_list(<table>)`
pub fn index_list(table: &str) -> Result<String> {
    Ok(format!("PRAGMA index_list({})", quote_identifier(table)?))
}

/// `PRAGMA foreign_key_list(<table>)`
pub fn foreign_key_list(table: &str) -> Result<String> {
    Ok(format!("PRAGMA foreign_key_list({})", quote_identifier(table)?))
}
