//! Viewer configuration.
//!
//! An optional YAML file tunes the defaults of the viewer. Every field has a
//! default, so an empty document is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! default_limit: 500
//! csv_delimiter: ";"
//! log_level: info
//! color: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::RowLimit;

/// Tunable defaults for a viewer session.
///
/// # Examples
///
/// ```
/// # use sqlite_viewer_core::ViewerConfig;
/// let config: ViewerConfig = serde_yaml::from_str("default_limit: 250").unwrap();
/// assert_eq!(config.default_limit.get(), 250);
/// assert_eq!(config.csv_delimiter, ';');
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Row limit applied to a freshly opened session.
    pub default_limit: RowLimit,
    /// Field delimiter for CSV export.
    pub csv_delimiter: char,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Colorize schema and SQL text in terminal output.
    pub color: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_limit: RowLimit::default(),
            csv_delimiter: ';',
            log_level: "warn".to_string(),
            color: false,
        }
    }
}

impl ViewerConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CoreError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::CoreError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
