//! Error types for database access and session handling.
//!
//! Connection failures and statement failures are kept apart so callers can
//! tell "could not open this file" from "this query is wrong".

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to an SQLite database.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// The database file could not be opened.
    #[error("cannot open database '{}': {source}", .path.display())]
    EngineError {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed to prepare or execute.
    #[error("query error: {0}")]
    QueryError(#[from] rusqlite::Error),

    /// Identifier or query construction failure.
    #[error(transparent)]
    Core(#[from] sqlite_viewer_core::CoreError),

    /// An operation needs an open database.
    #[error("no database is open")]
    NotConnected,

    /// An operation needs a selected table.
    #[error("no table selected")]
    NoTableSelected,

    /// The named table does not exist in the open database.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// The named column does not exist in the selected table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Export was requested before any rows were loaded.
    #[error("no data to export")]
    NothingToExport,
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
