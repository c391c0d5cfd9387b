// src/errors.rs
// DOCUMENTATION: Custom error types for every client operation
// PURPOSE: Centralized error handling for entire crate

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Crate-wide result alias
pub type GuideResult<T> = Result<T, GuideError>;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant belongs to one ErrorCategory (validation, authorization, network)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuideError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    #[error("Session storage error: {0}")]
    StorageError(String),
}

/// Informal error categories surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caught before submission or rejected by the server as malformed
    Validation,
    /// Caller must sign in (again) or lacks the role
    Authorization,
    /// Transport failures and non-validation server responses
    Network,
}

/// Error body shapes returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl GuideError {
    /// Map a non-success HTTP status and its body to an error
    /// DOCUMENTATION: Extracts `message` or `error` from JSON bodies, falls back to raw text
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.trim().to_string()
                }
            });

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                GuideError::ValidationError(message)
            }
            StatusCode::UNAUTHORIZED => GuideError::Unauthorized,
            StatusCode::FORBIDDEN => GuideError::Forbidden,
            StatusCode::NOT_FOUND => GuideError::NotFound(message),
            StatusCode::CONFLICT => GuideError::Conflict(message),
            _ => GuideError::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Category used to decide how the failure is presented
    pub fn category(&self) -> ErrorCategory {
        match self {
            GuideError::InvalidArgument(_) | GuideError::ValidationError(_) => {
                ErrorCategory::Validation
            }
            GuideError::Unauthorized | GuideError::Forbidden => ErrorCategory::Authorization,
            _ => ErrorCategory::Network,
        }
    }

    /// Whether a retry policy may attempt the request again
    /// Only transport failures and 5xx responses qualify
    pub fn is_retryable(&self) -> bool {
        match self {
            GuideError::NetworkError(_) | GuideError::Timeout(_) => true,
            GuideError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GuideError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GuideError::Timeout(e.to_string())
        } else if e.is_decode() {
            GuideError::DecodeError(e.to_string())
        } else if let Some(status) = e.status() {
            GuideError::from_status(status, "")
        } else {
            GuideError::NetworkError(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for GuideError {
    fn from(e: validator::ValidationErrors) -> Self {
        GuideError::ValidationError(e.to_string())
    }
}
