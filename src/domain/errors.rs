//! Domain error types
//!
//! This module defines the error hierarchy for benesync.
//! Errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main benesync error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Healthcare API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Malformed record field that cannot be normalized
    #[error("Format error: {0}")]
    Format(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Healthcare API errors
///
/// Errors that occur while talking to the external REST API.
/// These errors don't expose the HTTP client types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the server
    #[error("Failed to connect to API: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response could not be read
    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() {
            ApiError::ConnectionFailed(err.to_string())
        } else {
            ApiError::InvalidResponse(err.to_string())
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
