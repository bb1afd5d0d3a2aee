//! Error types for the DocuDB server.

use std::io;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Socket or stream I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An environment variable holds an unusable value.
    #[error("invalid {name}: {value}")]
    InvalidEnv {
        /// The environment variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}
