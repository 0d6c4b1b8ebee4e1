//! Core building blocks for the SQLite viewer.
//!
//! This crate holds everything that does not touch a live connection:
//!
//! - [`quote_identifier`]: renders table and column names as safe SQL
//!   fragments, quoting reserved words and non-trivial names.
//! - [`select_rows`], [`count_rows`], [`search_rows`]: parameterized
//!   statements for table browsing, with limits and search terms bound as
//!   [`QueryParam`]s.
//! - [`Value`], [`Row`], [`ResultSet`]: typed query results.
//! - [`SortState`], [`RowLimit`]: grid view state.
//! - [`highlight_schema`], [`highlight_sql`]: keyword tagging for text
//!   views.
//! - [`ViewerConfig`]: optional YAML configuration.
//!
//! # Example
//!
//! ```
//! use sqlite_viewer_core::*;
//!
//! let query = search_rows("Order", &["Group", "note"], "ABC", RowLimit::new(50)).unwrap();
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM \"Order\" WHERE \"Group\" LIKE ? OR note LIKE ? LIMIT ?"
//! );
//! assert_eq!(query.params.last(), Some(&QueryParam::Integer(50)));
//! ```

mod config;
mod error;
mod highlight;
mod ident;
mod query;
mod value;

pub use config::ViewerConfig;
pub use error::{CoreError, Result};
pub use highlight::{HighlightSpan, HighlightTag, highlight_schema, highlight_sql};
pub use ident::{is_reserved_word, needs_quoting, quote_identifier};
pub use query::{
    BuiltQuery, DEFAULT_LIMIT, MAX_LIMIT, QueryParam, RowLimit, SortDirection, SortState,
    count_rows, foreign_key_list, index_list, like_pattern, search_rows, select_rows, table_info,
};
pub use value::{ResultSet, Row, Value};
