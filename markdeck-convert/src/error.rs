//! Error types for conversion and image store operations

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error while reading the source format
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error while producing the target format
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Errors raised while loading a persisted image store
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("Could not read image store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed image store JSON: {0}")]
    Json(#[from] serde_json::Error),
}
