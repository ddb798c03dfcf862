//! Error types for the session-aware client.

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for authenticated request and session operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Transport-level HTTP failure (DNS, connection refused, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] client_storage::StorageError),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Stored token cannot be carried in an HTTP header
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server rejected an auth exchange (login/register)
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// The server answered with a body this client cannot interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
