//! Error types for the address book
//!
//! Provides a unified error type for all operations. Directory failures carry
//! a tagged [`ErrorKind`] so transports can pick a wire status without
//! inspecting messages.

use thiserror::Error;

/// Result type alias using BookError
pub type Result<T> = std::result::Result<T, BookError>;

/// Unified error type for address book operations
#[derive(Debug, Error)]
pub enum BookError {
    // -------------------------------------------------------------------------
    // Directory Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`BookError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    InvalidArgument,
    Internal,
}

impl BookError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            BookError::NotFound(_) => ErrorKind::NotFound,
            BookError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            _ => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for BookError {
    fn from(err: sqlx::Error) -> Self {
        BookError::Storage(err.to_string())
    }
}

impl From<bincode::Error> for BookError {
    fn from(err: bincode::Error) -> Self {
        BookError::Serialization(err.to_string())
    }
}
