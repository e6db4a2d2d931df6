//! Application error types for pokedex-sync
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Errors from fetching data from the upstream catalog API
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Network timeout
    #[error("Network timeout")]
    Timeout,

    /// Connection refused or unreachable
    #[error("Connection failed")]
    Connect,

    /// Generic transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream server error (HTTP 5xx)
    #[error("Server error: HTTP {0}")]
    Server(u16),

    /// Non-success, non-5xx response (HTTP 4xx and the like)
    #[error("Unexpected status: HTTP {0}")]
    Status(u16),

    /// Response body could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Async connection error
    #[error("Database connection error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    /// Record not found
    #[error("Record not found")]
    NotFound,
}

/// Cache-related errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CacheError {
    /// Cache backend unavailable
    #[error("Cache backend unavailable: {0}")]
    Backend(String),

    /// Serialization error
    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

/// Application-level error type
///
/// Aggregates all domain-specific error types for the binary's top level.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for determining if an error is retryable
pub trait RetryableError {
    /// Returns true if the error is transient and worth retrying
    fn is_retryable(&self) -> bool;
}

impl RetryableError for FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            // Transient: transport failures and server-side errors
            FetchError::Timeout => true,
            FetchError::Connect => true,
            FetchError::Network(_) => true,
            FetchError::Server(_) => true,

            // Permanent: client errors and contract violations
            FetchError::Status(_) => false,
            FetchError::Decode(_) => false,
        }
    }
}
