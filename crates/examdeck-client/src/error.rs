//! API error types.
//!
//! These represent failures when talking to the remote learning service.
//! Typed so callers can distinguish transient failures (worth a manual
//! retry) from permanent ones without string matching.

use thiserror::Error;

/// Errors from the remote learning service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed (missing or invalid token).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Whether a manual retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout(_) | ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status >= 500,
            ApiError::AuthenticationFailed(_) | ApiError::NotFound(_) => false,
        }
    }
}
