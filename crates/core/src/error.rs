//! Error types for gst-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for gst-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for gstasher operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("{0}")]
    Config(String),

    /// Invalid object key
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Feature not supported by backend
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidKey(_) => 2,         // UsageError
            Error::Config(_) => 2,             // UsageError
            Error::Network(_) => 3,            // NetworkError
            Error::Auth(_) => 4,               // AuthError
            Error::NotFound(_) => 5,           // NotFound
            Error::UnsupportedFeature(_) => 7, // UnsupportedFeature
            _ => 1,                            // GeneralError
        }
    }
}
