//! # Rating Value Object
//!
//! A provider rating on the closed interval `[0, 5]`.
//!
//! # Examples
//!
//! ```
//! use remit_compare::domain::value_objects::rating::Rating;
//! use rust_decimal::Decimal;
//!
//! let rating = Rating::new(Decimal::new(45, 1)).unwrap();
//! assert_eq!(rating.to_string(), "4.5");
//! assert!(Rating::new(Decimal::new(51, 1)).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated rating.
///
/// # Invariants
///
/// - `0 <= value <= 5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rating(Decimal);

impl Rating {
    /// Lowest rating.
    pub const MIN: Decimal = Decimal::ZERO;
    /// Highest rating.
    pub const MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    /// Creates a rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if the value is outside `[0, 5]`.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Self::MIN || value > Self::MAX {
            return Err(DomainError::InvalidRating(format!(
                "{value} is outside [0, 5]"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Creates a rating from a float, as found in JSON payloads.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` for NaN, infinities or
    /// out-of-range values.
    pub fn from_f64(value: f64) -> DomainResult<Self> {
        let decimal = Decimal::from_f64(value)
            .ok_or_else(|| DomainError::InvalidRating(value.to_string()))?;
        Self::new(decimal.round_dp(2))
    }

    /// Creates a rating by clamping into `[0, 5]`.
    #[must_use]
    pub fn clamped(value: Decimal) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX).normalize())
    }

    /// Returns the rating value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for Decimal {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}
