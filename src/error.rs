//! Error types for filegate.

use thiserror::Error;

/// Common error type for filegate.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A client-supplied file name that is not a single plain path segment.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filegate operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
