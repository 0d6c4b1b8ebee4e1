//! Error types for identifier handling, query building and configuration.

use thiserror::Error;

/// Errors raised by the pure query-building layer and the config loader.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Identifier is empty and cannot be rendered as a SQL fragment.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A search query was requested over zero columns.
    #[error("search requires at least one column")]
    NoSearchColumns,

    /// File I/O failure while reading or writing configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
