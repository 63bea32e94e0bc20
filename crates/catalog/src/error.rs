//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur while loading catalog data or recording feedback
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A dataset file could not be found or opened
    #[error("Failed to open dataset file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset file contained malformed JSON
    #[error("Parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record carried an invalid field value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
