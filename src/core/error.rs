//! Error types for butterfly-path
//!
//! Step records carry no checksum, so the only failures the library can detect
//! are I/O failures (including truncated records) and bad configuration.

/// Main error type for butterfly-path operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File or stream I/O error, including a short read inside a record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or holds unusable values
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Caller supplied data the operation cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the error is a short read inside a step record
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Io(err) if err.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// Convenience result type for butterfly-path operations
pub type Result<T> = std::result::Result<T, Error>;
