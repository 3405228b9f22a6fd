//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Provides failure classification for retry decisions and normalization of
//! every request failure into a fixed, user-safe message.
//!
//! ## Failure Categories
//!
//! - **Network**: No response received (retry with backoff)
//! - **RateLimit**: HTTP 429 (retry with backoff)
//! - **Server**: HTTP 5xx (retry with backoff)
//! - **Client**: Any other non-success status (fail fast)
//! - **Decode**: Success status with an unusable body (fail fast)
//! - **Unexpected**: Anything else (fail fast)
//!
//! ## Design Principles
//!
//! - Single unified error type (HitlensError) for the entire application
//! - Request failures display only the normalized message; status, attempts
//!   and raw body stay in `FailureDiagnostics` for operators
//! - No panic/unwrap - all errors are recoverable

use serde_json::Value;
use thiserror::Error;

use crate::constants::messages;

// =============================================================================
// Failure Categories
// =============================================================================

/// Failure categories driving retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// No response received (connection refused, DNS, timeout)
    Network,
    /// HTTP 429
    RateLimit,
    /// HTTP 5xx
    Server,
    /// Any other non-success status
    Client,
    /// Success status but the body could not be used
    Decode,
    /// Failure of unknown shape
    Unexpected,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Server => write!(f, "SERVER"),
            Self::Client => write!(f, "CLIENT"),
            Self::Decode => write!(f, "DECODE"),
            Self::Unexpected => write!(f, "UNEXPECTED"),
        }
    }
}

impl FailureCategory {
    /// Check if this category may be retried within the attempt budget
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::Server)
    }

    /// Classify an HTTP status that was not a success
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            s if s >= 500 => Self::Server,
            _ => Self::Client,
        }
    }
}

// =============================================================================
// Attempt Failure
// =============================================================================

/// Raw failure of a single request attempt, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// The request went out but no response came back
    NoResponse { detail: String },
    /// A response arrived with a non-success status
    Status { status: u16, body: String },
    /// The request could not be issued at all
    Unexpected { detail: String },
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoResponse { detail } => write!(f, "no response: {}", detail),
            Self::Status { status, .. } => write!(f, "HTTP {}", status),
            Self::Unexpected { detail } => write!(f, "unexpected: {}", detail),
        }
    }
}

impl AttemptFailure {
    pub fn no_response(detail: impl Into<String>) -> Self {
        Self::NoResponse {
            detail: detail.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected {
            detail: detail.into(),
        }
    }
}

/// Default classifier: no response, 5xx and 429 are retryable, everything
/// else is terminal.
pub fn classify_failure(failure: &AttemptFailure) -> FailureCategory {
    match failure {
        AttemptFailure::NoResponse { .. } => FailureCategory::Network,
        AttemptFailure::Status { status, .. } => FailureCategory::from_status(*status),
        AttemptFailure::Unexpected { .. } => FailureCategory::Unexpected,
    }
}

// =============================================================================
// Request Failure
// =============================================================================

/// Operator-only detail of a failed request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureDiagnostics {
    /// Logical operation, e.g. "POST /predict"
    pub operation: String,
    /// Attempts consumed before giving up
    pub attempts: usize,
    pub status: Option<u16>,
    /// `error.code` from a structured error payload
    pub error_code: Option<String>,
    /// Raw response body
    pub body: Option<String>,
    /// Transport or decode detail
    pub detail: Option<String>,
}

/// Final, classified failure of a request after the retry loop.
///
/// `Display` yields only the normalized user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFailure {
    pub category: FailureCategory,
    message: String,
    diagnostics: FailureDiagnostics,
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RequestFailure {}

impl RequestFailure {
    /// Normalize the last attempt failure into a user-safe failure
    pub fn from_attempt(
        failure: AttemptFailure,
        category: FailureCategory,
        operation: impl Into<String>,
        attempts: usize,
    ) -> Self {
        let mut diagnostics = FailureDiagnostics {
            operation: operation.into(),
            attempts,
            ..Default::default()
        };

        let message = match failure {
            AttemptFailure::Status { status, body } => {
                let payload = serde_json::from_str::<Value>(&body).ok();
                diagnostics.status = Some(status);
                diagnostics.error_code = payload.as_ref().and_then(structured_error_code);
                diagnostics.body = Some(body);
                payload
                    .as_ref()
                    .and_then(structured_error_message)
                    .unwrap_or_else(|| messages::GENERIC_RESPONSE_ERROR.to_string())
            }
            AttemptFailure::NoResponse { detail } => {
                diagnostics.detail = Some(detail);
                messages::NETWORK_ERROR.to_string()
            }
            AttemptFailure::Unexpected { detail } => {
                diagnostics.detail = Some(detail);
                messages::UNEXPECTED_ERROR.to_string()
            }
        };

        Self {
            category,
            message,
            diagnostics,
        }
    }

    /// A success response whose body could not be used
    pub fn decode(operation: impl Into<String>, attempts: usize, detail: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::Decode,
            message: messages::UNEXPECTED_ERROR.to_string(),
            diagnostics: FailureDiagnostics {
                operation: operation.into(),
                attempts,
                detail: Some(detail.into()),
                ..Default::default()
            },
        }
    }

    pub fn user_message(&self) -> &str {
        &self.message
    }

    pub fn diagnostics(&self) -> &FailureDiagnostics {
        &self.diagnostics
    }

    pub fn attempts(&self) -> usize {
        self.diagnostics.attempts
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `{ error: { message } }` first, then `{ message }`
fn structured_error_message(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("error").and_then(|e| e.get("message")))
        .or_else(|| non_empty_str(payload.get("message")))
}

fn structured_error_code(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("error").and_then(|e| e.get("code")))
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum HitlensError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    /// Classified request failure; displays the normalized message only
    #[error("{0}")]
    Request(#[from] RequestFailure),

    #[error("HTTP client error: {0}")]
    Http(String),

    // -------------------------------------------------------------------------
    // Workflow Errors
    // -------------------------------------------------------------------------
    /// Submission blocked by validation or missing fields
    #[error("{message} ({invalid_fields} field(s) invalid)")]
    IncompleteSubmission {
        message: String,
        invalid_fields: usize,
    },

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// Primary stage failed; carries the normalized message
    #[error("{0}")]
    PredictionFailed(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HitlensError>;

impl HitlensError {
    pub fn incomplete_submission(invalid_fields: usize) -> Self {
        Self::IncompleteSubmission {
            message: messages::INCOMPLETE_SUBMISSION.to_string(),
            invalid_fields,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
