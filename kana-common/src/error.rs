//! Common error types for KanaFlash

use thiserror::Error;

/// Common result type for KanaFlash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across KanaFlash crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored data failed to decode (e.g. malformed characters JSON)
    #[error("Data error: {0}")]
    Data(String),
}
