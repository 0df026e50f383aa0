//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading the tag vocabulary artifact
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON artifact could not be decoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Line in a text artifact couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same token string was assigned two ids
    #[error("Duplicate token in vocabulary: {token}")]
    DuplicateToken { token: String },

    /// Two tokens share one id, so the reverse mapping would be ambiguous
    #[error("Duplicate id {id} in vocabulary (tokens {first} and {second})")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
