//! # Source Errors
//!
//! Error types for quote sources and rate services.
//!
//! A [`SourceError`] never escapes the collector: the failing source
//! contributes zero quotes and the failure is recorded.
//!
//! # Examples
//!
//! ```
//! use remit_compare::infrastructure::sources::error::SourceError;
//!
//! let error = SourceError::timeout_with_duration("generic aggregator", 3000);
//! assert!(error.is_retryable());
//!
//! let error = SourceError::malformed_payload("missing field `rate`");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Errors produced while fetching from an external source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source did not answer in time.
    #[error("source timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// The source could not be reached.
    #[error("source connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The source answered with a non-success status.
    #[error("source returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The payload could not be decoded into quotes.
    #[error("malformed source payload: {message}")]
    MalformedPayload {
        /// Error message.
        message: String,
    },

    /// The source does not price this request.
    #[error("unsupported by source: {message}")]
    Unsupported {
        /// Error message.
        message: String,
    },

    /// Client-side failure unrelated to the remote end.
    #[error("source internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SourceError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error recording the elapsed bound.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a malformed payload error.
    #[must_use]
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Creates an unsupported request error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if a later attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MalformedPayload { .. } | Self::Unsupported { .. } | Self::Internal { .. } => {
                false
            }
        }
    }

    /// Returns a short machine-readable kind, used in logs and API payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::Status { .. } => "status",
            Self::MalformedPayload { .. } => "malformed-payload",
            Self::Unsupported { .. } => "unsupported",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
