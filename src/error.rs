//! Error types for gw-leaderboard
//!
//! This module provides error handling for the library, including:
//! - The domain error type shared by the engine, the worker API and the proxy
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//!
//! Page and history fetches never produce an [`Error`]: they collapse every
//! failure into [`FetchOutcome::Unavailable`](crate::types::FetchOutcome).
//! The only request-fatal failure inside the core is
//! [`Error::LeagueFetchFailed`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for gw-leaderboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// User-facing message for an empty league collection
pub const LEAGUE_FETCH_FAILED_MESSAGE: &str = "Failed to fetch league data";

/// User-facing message when the worker exceeds the proxy deadline
pub const UPSTREAM_TIMEOUT_MESSAGE: &str = "Processing timeout. Please try again.";

/// User-facing message when the worker cannot be reached
pub const UPSTREAM_UNREACHABLE_MESSAGE: &str = "Worker server not available. Please check the status page and contact the developer if the issue persists.";

/// Main error type for gw-leaderboard
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "remote.base_url")
        key: Option<String>,
    },

    /// League collection produced no members; no leaderboard can be built
    #[error("failed to fetch league data for league {league_id}")]
    LeagueFetchFailed {
        /// The league that could not be collected
        league_id: u64,
    },

    /// The worker did not answer within the proxy's outer deadline
    #[error("worker timed out after {after:?}")]
    UpstreamTimeout {
        /// The deadline that was exceeded
        after: Duration,
    },

    /// The worker could not be reached at all
    #[error("cannot connect to worker at {url}: {reason}")]
    UpstreamUnreachable {
        /// Worker base URL
        url: String,
        /// Transport-level reason
        reason: String,
    },

    /// The worker answered with a non-success status
    #[error("worker returned status {status}: {message}")]
    Worker {
        /// HTTP status returned by the worker
        status: u16,
        /// Error message extracted from the worker response body
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Request body could not be read as a leaderboard request
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Message shown to an end user at the proxy boundary.
    ///
    /// League, timeout and unreachable failures each keep their own text so
    /// an operator can tell them apart from a screenshot.
    pub fn user_message(&self) -> String {
        match self {
            Error::LeagueFetchFailed { .. } => LEAGUE_FETCH_FAILED_MESSAGE.to_string(),
            Error::UpstreamTimeout { .. } => UPSTREAM_TIMEOUT_MESSAGE.to_string(),
            Error::UpstreamUnreachable { .. } => UPSTREAM_UNREACHABLE_MESSAGE.to_string(),
            Error::Worker { message, .. } => message.clone(),
            Error::InvalidRequest(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// API error response format
///
/// Returned by the structured endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "league_fetch_failed",
///     "message": "failed to fetch league data for league 208271",
///     "details": {
///       "league_id": 208271
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "league_fetch_failed")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

}

/// Flat `{"error": "..."}` body used by `/process` and `/leaderboard`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SimpleError {
    /// Human-readable error message
    pub error: String,
}

impl SimpleError {
    /// Create a flat error body
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Config { .. } => 400,
            Error::LeagueFetchFailed { .. } => 400,
            Error::InvalidRequest(_) => 400,

            // Worker status passes through unchanged
            Error::Worker { status, .. } => *status,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Serialization(_) => 500,

            // 502 Bad Gateway
            Error::Network(_) => 502,

            // 503 Service Unavailable
            Error::UpstreamUnreachable { .. } => 503,

            // 504 Gateway Timeout
            Error::UpstreamTimeout { .. } => 504,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::LeagueFetchFailed { .. } => "league_fetch_failed",
            Error::UpstreamTimeout { .. } => "upstream_timeout",
            Error::UpstreamUnreachable { .. } => "upstream_unreachable",
            Error::Worker { .. } => "worker_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::LeagueFetchFailed { league_id } => Some(serde_json::json!({
                "league_id": league_id,
            })),
            Error::UpstreamTimeout { after } => Some(serde_json::json!({
                "timeout_secs": after.as_secs(),
            })),
            Error::UpstreamUnreachable { url, .. } => Some(serde_json::json!({
                "worker_url": url,
            })),
            Error::Worker { status, .. } => Some(serde_json::json!({
                "status": status,
            })),
            _ => None,
        };

        match details {
            Some(details) => ApiError::with_details(code, message, details),
            None => ApiError::new(code, message),
        }
    }
}
