//! Provider error classification
//!
//! Maps provider `message_code` values, HTTP statuses, and transport failures to
//! the [`ErrorKind`] taxonomy. The table in [`ErrorKind::from_provider_code`] is
//! the single source of truth for retry policy: the retry loop and the
//! submission orchestrator only ever ask an error for its [`Classification`].

use crate::error::{Error, ErrorCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Retries allowed for recoverable kinds, on top of the first attempt
pub const MAX_RECOVERABLE_RETRIES: u32 = 3;

/// Provider error taxonomy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Codes 1001-1002, or credentials missing locally
    Authentication,
    /// Codes 2001-2004, or attachment rejected locally
    Submission,
    /// Codes 3001-3002
    NotFound,
    /// Code 4001
    Payment,
    /// Code 5001, or HTTP 5xx without a provider code
    Server,
    /// Code 5002
    ServiceUnavailable,
    /// Code 5003
    Database,
    /// Timeout or provider unreachable
    Offline,
    /// Everything else
    Unexpected,
}

impl ErrorKind {
    /// Every kind, in taxonomy order
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::Authentication,
        ErrorKind::Submission,
        ErrorKind::NotFound,
        ErrorKind::Payment,
        ErrorKind::Server,
        ErrorKind::ServiceUnavailable,
        ErrorKind::Database,
        ErrorKind::Offline,
        ErrorKind::Unexpected,
    ];

    /// Look up the kind for a provider `message_code`
    pub fn from_provider_code(code: i64) -> Self {
        match code {
            1001..=1002 => ErrorKind::Authentication,
            2001..=2004 => ErrorKind::Submission,
            3001..=3002 => ErrorKind::NotFound,
            4001 => ErrorKind::Payment,
            5001 => ErrorKind::Server,
            5002 => ErrorKind::ServiceUnavailable,
            5003 => ErrorKind::Database,
            _ => ErrorKind::Unexpected,
        }
    }

    /// Whether the underlying condition may clear without client changes
    pub fn recoverable(self) -> bool {
        matches!(self, ErrorKind::Server | ErrorKind::Offline)
    }

    /// Whether an operation failing with this kind should be retried
    pub fn retryable(self) -> bool {
        self.recoverable()
    }

    /// Retries allowed after the first attempt
    pub fn max_retries(self) -> u32 {
        if self.retryable() {
            MAX_RECOVERABLE_RETRIES
        } else {
            0
        }
    }

    /// Stable snake_case name, as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Submission => "submission",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Payment => "payment",
            ErrorKind::Server => "server",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::Database => "database",
            ErrorKind::Offline => "offline",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind, message, and retry policy of one failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Classification {
    /// Taxonomy kind
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Whether the condition may clear on its own
    pub recoverable: bool,
    /// Whether the operation should be retried
    pub retryable: bool,
    /// Retries allowed after the first attempt
    pub max_retries: u32,
}

impl Classification {
    /// Classification of `kind` with the given message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            recoverable: kind.recoverable(),
            retryable: kind.retryable(),
            max_retries: kind.max_retries(),
        }
    }
}

/// Turn a non-zero provider `message_code` into a typed error
pub fn classify_code(code: i64, message: impl Into<String>) -> Error {
    let message = message.into();
    let message = if message.trim().is_empty() {
        default_message(code).to_string()
    } else {
        message
    };
    Error::from_kind(
        ErrorKind::from_provider_code(code),
        ErrorCode::Provider(code),
        message,
    )
}

/// Turn a non-success HTTP status without a provider code into a typed error
///
/// 5xx responses are treated as transient server faults; anything else is
/// unexpected.
pub fn classify_status(status: u16, message: impl Into<String>) -> Error {
    let kind = match status {
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Unexpected,
    };
    Error::from_kind(kind, ErrorCode::Http(status), message)
}

/// Classify a reqwest failure so it never leaves the transport layer raw
///
/// Timeouts and connection failures mean the provider is unreachable; a body
/// that is not the expected JSON is unexpected.
pub fn classify_transport(err: &reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        Error::Offline {
            code: ErrorCode::Local("timeout"),
            message: format!("request to '{}' timed out", url),
        }
    } else if err.is_connect() || err.is_request() {
        Error::Offline {
            code: ErrorCode::Local("unreachable"),
            message: format!("could not reach '{}': {}", url, err),
        }
    } else if err.is_decode() {
        Error::Unexpected {
            code: ErrorCode::Local("invalid_response"),
            message: format!("invalid response from '{}': {}", url, err),
        }
    } else {
        Error::Unexpected {
            code: ErrorCode::Local("transport"),
            message: format!("request to '{}' failed: {}", url, err),
        }
    }
}

/// Classify a reqwest failure on a call that creates provider-side state
///
/// Only failures where the request never left the client stay retryable.
/// Once the body may have been sent, a timeout or broken response means the
/// provider may have acted on it, so the outcome is reported as unknown and
/// is never retried.
pub fn classify_unsafe_transport(err: &reqwest::Error, url: &str) -> Error {
    if err.is_connect() || err.is_builder() {
        return classify_transport(err, url);
    }

    let cause = if err.is_timeout() {
        "timed out waiting for the response".to_string()
    } else {
        format!("response was lost: {}", err)
    };
    Error::Unexpected {
        code: ErrorCode::Local("outcome_unknown"),
        message: format!(
            "filing outcome unknown: request to '{}' {}; check the provider before resubmitting",
            url, cause
        ),
    }
}

fn default_message(code: i64) -> &'static str {
    match ErrorKind::from_provider_code(code) {
        ErrorKind::Authentication => "Invalid credentials",
        ErrorKind::Submission => "Filing rejected by provider",
        ErrorKind::NotFound => "Requested resource not found",
        ErrorKind::Payment => "Payment failed",
        ErrorKind::Server => "Provider internal error",
        ErrorKind::ServiceUnavailable => "Provider service unavailable",
        ErrorKind::Database => "Provider database error",
        ErrorKind::Offline => "Provider unreachable",
        ErrorKind::Unexpected => "Unexpected provider response",
    }
}
