//! Error types for evict-efile
//!
//! This module provides the error taxonomy shared by every layer of the crate:
//! - One variant per provider error kind (authentication, submission, server, offline, ...)
//! - An [`ErrorCode`] carrying the original provider code or a local reason
//! - HTTP status code mapping for the facade
//! - Structured error bodies with machine-readable error codes
//!
//! Raw transport failures never appear here; they are classified into one of the
//! kinds first (see [`crate::classify`]).

use crate::classify::{Classification, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for evict-efile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Code attached to every classified error
///
/// Provider failures keep the integer code the provider returned so callers can
/// report it verbatim. Failures detected locally (validation, transport) use a
/// short snake_case reason instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// Provider `message_code` (e.g. 5001)
    Provider(i64),
    /// Non-success HTTP status without a provider code in the body
    Http(u16),
    /// Locally detected condition (e.g. "missing_credentials", "file_too_large")
    Local(&'static str),
}

impl ErrorCode {
    /// The provider code, if this error originated from one
    pub fn provider_code(&self) -> Option<i64> {
        match self {
            ErrorCode::Provider(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Provider(code) => write!(f, "{}", code),
            ErrorCode::Http(status) => write!(f, "http_{}", status),
            ErrorCode::Local(reason) => f.write_str(reason),
        }
    }
}

/// Main error type for evict-efile
///
/// Every provider-facing variant carries the [`ErrorCode`] and a human-readable
/// message. Use [`Error::classification`] to get the retry policy for an error.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "VITE_EFILE_BASE_URL")
        key: Option<String>,
    },

    /// Credentials missing, rejected, or token absent from the provider response
    #[error("authentication failed: {message}")]
    Authentication {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Filing rejected or attachment invalid; the caller must correct the request
    #[error("submission failed: {message}")]
    Submission {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Case, court, or filing code unknown to the provider
    #[error("not found: {message}")]
    NotFound {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Payment account rejected or unavailable
    #[error("payment error: {message}")]
    Payment {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Transient provider-side fault
    #[error("provider server error: {message}")]
    Server {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Provider is down for maintenance or otherwise unavailable
    #[error("provider service unavailable: {message}")]
    ServiceUnavailable {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Provider reported a storage failure
    #[error("provider database error: {message}")]
    Database {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Provider unreachable or request timed out
    #[error("provider unreachable: {message}")]
    Offline {
        /// Local reason ("timeout", "unreachable")
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// Anything the taxonomy does not map
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Provider code or local reason
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

impl Error {
    /// Build the variant for `kind` with the given code and message
    pub fn from_kind(kind: ErrorKind, code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Authentication => Error::Authentication { code, message },
            ErrorKind::Submission => Error::Submission { code, message },
            ErrorKind::NotFound => Error::NotFound { code, message },
            ErrorKind::Payment => Error::Payment { code, message },
            ErrorKind::Server => Error::Server { code, message },
            ErrorKind::ServiceUnavailable => Error::ServiceUnavailable { code, message },
            ErrorKind::Database => Error::Database { code, message },
            ErrorKind::Offline => Error::Offline { code, message },
            ErrorKind::Unexpected => Error::Unexpected { code, message },
        }
    }

    /// Taxonomy kind of this error
    ///
    /// Ambient failures (configuration, API server) are reported as `Unexpected`:
    /// they are never retried and carry no provider meaning.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Submission { .. } => ErrorKind::Submission,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Payment { .. } => ErrorKind::Payment,
            Error::Server { .. } => ErrorKind::Server,
            Error::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Error::Database { .. } => ErrorKind::Database,
            Error::Offline { .. } => ErrorKind::Offline,
            Error::Unexpected { .. } | Error::Config { .. } | Error::ApiServerError(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// The code carried by this error, if any
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Error::Authentication { code, .. }
            | Error::Submission { code, .. }
            | Error::NotFound { code, .. }
            | Error::Payment { code, .. }
            | Error::Server { code, .. }
            | Error::ServiceUnavailable { code, .. }
            | Error::Database { code, .. }
            | Error::Offline { code, .. }
            | Error::Unexpected { code, .. } => Some(code),
            Error::Config { .. } | Error::ApiServerError(_) => None,
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Error::Config { message, .. }
            | Error::Authentication { message, .. }
            | Error::Submission { message, .. }
            | Error::NotFound { message, .. }
            | Error::Payment { message, .. }
            | Error::Server { message, .. }
            | Error::ServiceUnavailable { message, .. }
            | Error::Database { message, .. }
            | Error::Offline { message, .. }
            | Error::Unexpected { message, .. } => message,
            Error::ApiServerError(message) => message,
        }
    }

    /// Kind, message, and retry policy for this error
    pub fn classification(&self) -> Classification {
        Classification::new(self.kind(), self.message())
    }
}

/// API error response format
///
/// This structure is returned by the facade when an operation fails. The
/// `code` is the provider code when there is one, so the UI can show it
/// verbatim.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": "authentication_error",
///   "message": "authentication failed: Invalid username or password",
///   "code": "1001",
///   "details": { "kind": "authentication", "recoverable": false, "retryable": false }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error category (e.g. "authentication_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Provider code or local reason
    pub code: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a "validation error" error for malformed facade requests
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new("validation_error", message, code)
    }
}

/// Convert errors to HTTP status codes for facade responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Authentication { .. } => 401,
            Error::Payment { .. } => 402,
            Error::NotFound { .. } => 404,
            // Client-correctable filing problems
            Error::Submission { .. } => 422,

            Error::Config { .. } => 500,
            Error::ApiServerError(_) => 500,

            // Upstream failures
            Error::Server { .. } => 502,
            Error::Database { .. } => 502,
            Error::Unexpected { .. } => 502,
            Error::ServiceUnavailable { .. } => 503,
            Error::Offline { .. } => 504,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Authentication { .. } => "authentication_error",
            Error::Submission { .. } => "submission_error",
            Error::NotFound { .. } => "not_found",
            Error::Payment { .. } => "payment_error",
            Error::Server { .. } => "server_error",
            Error::ServiceUnavailable { .. } => "service_unavailable",
            Error::Database { .. } => "database_error",
            Error::Offline { .. } => "offline",
            Error::Unexpected { .. } => "unexpected_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let classification = error.classification();
        let code = match (&error, error.code()) {
            (_, Some(code)) => code.to_string(),
            (Error::Config { key: Some(key), .. }, None) => key.clone(),
            _ => error.error_code().to_string(),
        };

        ApiError {
            error: error.error_code().to_string(),
            message: error.to_string(),
            code,
            details: Some(serde_json::json!({
                "kind": classification.kind,
                "recoverable": classification.recoverable,
                "retryable": classification.retryable,
            })),
        }
    }
}
