//! Error types for the enrichment engine
//!
//! The engine's failure policy keeps almost everything inside the result:
//! tier failures become warnings, resolution failures become error strings on
//! the `CaseResult`. `EnrichError` is reserved for the one thing that may
//! escape the boundary (malformed caller-supplied input) plus local
//! configuration problems.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EnrichError>;

/// Engine error
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Malformed caller-supplied input (e.g. non-object research inputs)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
