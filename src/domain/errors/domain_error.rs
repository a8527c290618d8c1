//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! # Examples
//!
//! ```
//! use remit_compare::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidRate("rate must be positive".to_string());
//! assert_eq!(error.code(), 1001);
//! assert!(error.is_validation_error());
//! ```

use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | Arithmetic errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Exchange rate is zero, negative or unparseable.
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// Transfer amount is zero, negative or unparseable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Transfer fee is negative or unparseable.
    #[error("invalid fee: {0}")]
    InvalidFee(String),

    /// Currency code is not three ASCII letters.
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    /// Rating lies outside `[0, 5]`.
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    /// Provider identity yields no usable key.
    #[error("invalid provider key: {0}")]
    InvalidProviderKey(String),

    /// Generic validation error.
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========================================================================
    // Arithmetic Errors (2000-2999)
    // ========================================================================
    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl DomainError {
    /// Returns the numeric error code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidRate(_) => 1001,
            Self::InvalidAmount(_) => 1002,
            Self::InvalidFee(_) => 1003,
            Self::InvalidCurrency(_) => 1004,
            Self::InvalidRating(_) => 1005,
            Self::InvalidProviderKey(_) => 1006,
            Self::ValidationError(_) => 1099,

            Self::Overflow => 2001,
            Self::DivisionByZero => 2002,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "arithmetic",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
