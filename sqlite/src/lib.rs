//! SQLite access for the viewer.
//!
//! This crate is the database collaborator of the viewer: it opens one
//! database file, introspects its schema, runs the parameterized browse and
//! search statements built by [`sqlite_viewer_core`], and passes user SQL
//! through verbatim.
//!
//! # Architecture
//!
//! - **`database`**: [`Database`] handle, generated-query execution and the
//!   verbatim SQL editor path
//! - **`schema`**: tables, columns, indexes, foreign keys, `CREATE` text
//! - **`query`**: paged fetches, row counts, multi-column search
//! - **`convert`**: `rusqlite` values ↔ [`Value`](sqlite_viewer_core::Value)
//! - **`session`**: [`Session`], the explicit open/close lifecycle and grid
//!   state that a front end drives
//!
//! # Quick start
//!
//! ```no_run
//! use sqlite_viewer_sqlite::Session;
//!
//! let mut session = Session::default();
//! let tables = session.open("shop.db").unwrap().to_vec();
//! println!("tables: {tables:?}");
//!
//! let page = session.load().unwrap();
//! println!("{}", page.status());
//!
//! let view = session.schema(None).unwrap();
//! println!("{}", view.to_text());
//! ```

mod convert;
mod database;
mod error;
mod query;
mod schema;
mod session;

pub use database::{Database, SqlExecution, SqlOutcome};
pub use error::{Result, SqliteError};
pub use schema::{ColumnInfo, ForeignKeyInfo, IndexInfo, TableSummary};
pub use session::{GridMode, GridPage, SchemaView, Session, render_all_schemas};
