//! CSV export for SQLite viewer grids.
//!
//! [`write_csv`] writes a [`ResultSet`](sqlite_viewer_core::ResultSet) as a
//! `;`-separated, BOM-prefixed UTF-8 file; [`read_csv`] reads such a file
//! back for verification. [`default_export_name`] suggests a timestamped
//! file name for the selected table.
//!
//! # Example
//!
//! ```no_run
//! use sqlite_viewer_core::{ResultSet, Value};
//! use sqlite_viewer_export::{CsvOptions, write_csv};
//!
//! let set = ResultSet::from_values(
//!     vec!["id".into(), "name".into()],
//!     vec![vec![Value::Integer(1), Value::from("Ada")]],
//! );
//! let rows = write_csv("people.csv", &set, &CsvOptions::default()).unwrap();
//! assert_eq!(rows, 1);
//! ```

mod csv_file;
mod error;
mod naming;

pub use csv_file::{CsvOptions, CsvTable, read_csv, read_csv_from, write_csv, write_csv_to};
pub use error::{ExportError, Result};
pub use naming::default_export_name;
