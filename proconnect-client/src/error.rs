//! Error types for the ProConnect transport layer

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Transport-layer error
///
/// Note that HTTP failures on individual requests are NOT errors at this
/// level: they are reported inside [`crate::ApiResponse`] so callers can
/// apply their own degradation policy. `ClientError` covers construction
/// and caller-input problems only.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bearer token missing or unusable after normalization
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// Client construction failed (TLS backend, header values)
    #[error("Client configuration error: {0}")]
    Config(String),

    /// Malformed caller-supplied input (e.g. unreadable headers file)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
