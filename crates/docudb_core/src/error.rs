//! Error types for DocuDB core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in DocuDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// I/O error reading or writing a collection or index file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encode/decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The command payload is not valid JSON or not of the expected shape.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// Description of the shape problem.
        message: String,
    },

    /// Attempted to encode a non-indexable value into a B+tree key.
    #[error("cannot index {kind} values")]
    UnsupportedKey {
        /// The value kind that cannot be encoded.
        kind: &'static str,
    },

    /// An index on the field already exists.
    #[error("index on field '{field}' already exists")]
    IndexExists {
        /// The indexed field name.
        field: String,
    },

    /// An index file on disk is structurally invalid.
    #[error("invalid index file: {message}")]
    InvalidIndexFile {
        /// Description of the format issue.
        message: String,
    },
}

impl CoreError {
    /// Creates a malformed input error.
    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Creates an invalid index file error.
    pub fn invalid_index_file(message: impl Into<String>) -> Self {
        Self::InvalidIndexFile {
            message: message.into(),
        }
    }
}
