//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)             - Validation and arithmetic failures
//! ├── Aggregation(AggregationError)   - No usable quotes for a request
//! ├── Repository(RepositoryError)     - Rating store failures
//! ├── Configuration(String)           - Invalid or unloadable configuration
//! ├── Validation(String)              - Request validation failures
//! └── Internal(String)                - Unexpected failures
//! ```
//!
//! # Examples
//!
//! ```
//! use remit_compare::application::error::{AggregationError, ApplicationError};
//!
//! let err: ApplicationError = AggregationError::NoSourcesAvailable.into();
//! assert!(err.is_retryable());
//!
//! let err = ApplicationError::validation("amount must be positive");
//! assert!(!err.is_retryable());
//! ```

use crate::application::services::collector::SourceFailure;
use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Failure to produce any quote for a request.
///
/// Every variant is retryable: the condition is transient from the
/// caller's point of view.
#[derive(Debug, Clone, Error)]
pub enum AggregationError {
    /// No quote sources are configured.
    #[error("no quote sources available")]
    NoSourcesAvailable,

    /// Every configured source failed.
    #[error("all {} quote sources failed", .0.len())]
    AllSourcesFailed(Vec<SourceFailure>),

    /// Sources answered but produced no usable quote.
    #[error("no quotes returned by {sources_responded} responding sources")]
    NoQuotes {
        /// Number of sources that answered.
        sources_responded: usize,
    },
}

impl AggregationError {
    /// Returns true if the caller should offer a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// Returns a short machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSourcesAvailable => "NO_SOURCES_AVAILABLE",
            Self::AllSourcesFailed(_) => "ALL_SOURCES_FAILED",
            Self::NoQuotes { .. } => "NO_QUOTES",
        }
    }
}

/// Application layer error type.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Aggregation failure.
    #[error("aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    /// Rating store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the operation may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Aggregation(e) => e.is_retryable(),
            Self::Repository(_) => true,
            Self::Domain(_) | Self::Configuration(_) | Self::Validation(_) | Self::Internal(_) => {
                false
            }
        }
    }

    /// Returns true if the error was caused by bad caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_validation_error(),
            Self::Validation(_) => true,
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
