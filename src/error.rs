//! Error types shared across the crate.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input or configuration a component cannot accept
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
