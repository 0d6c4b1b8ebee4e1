//! Error types for CSV export.

use thiserror::Error;

/// Errors that can occur while exporting or re-reading a grid.
#[derive(Debug, Error)]
pub enum ExportError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoding or decoding failure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The delimiter is not a single ASCII character.
    #[error("invalid CSV delimiter '{0}': must be a single ASCII character")]
    InvalidDelimiter(char),

    /// The grid has no columns or no rows.
    #[error("no data to export")]
    NothingToExport,
}

/// Convenience alias for results with [`ExportError`].
pub type Result<T> = std::result::Result<T, ExportError>;
