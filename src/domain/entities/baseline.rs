//! # Baseline Rate
//!
//! The mid-market reference rate in effect for one aggregation run.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::BaselineSource;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The baseline every margin in a run is measured against.
///
/// # Invariants
///
/// - `rate > 0`
///
/// # Examples
///
/// ```
/// use remit_compare::domain::entities::baseline::BaselineRate;
/// use remit_compare::domain::value_objects::BaselineSource;
/// use rust_decimal::Decimal;
///
/// let baseline = BaselineRate::new(Decimal::new(117, 2), BaselineSource::ExternalService).unwrap();
/// assert!(!baseline.is_degraded());
///
/// let neutral = BaselineRate::neutral();
/// assert_eq!(neutral.rate(), Decimal::ONE);
/// assert!(neutral.is_degraded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRate {
    rate: Decimal,
    resolved_at: Timestamp,
    source: BaselineSource,
}

impl BaselineRate {
    /// Creates a baseline resolved now.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if `rate` is not positive.
    pub fn new(rate: Decimal, source: BaselineSource) -> DomainResult<Self> {
        Self::at(rate, source, Timestamp::now())
    }

    /// Creates a baseline with an explicit resolution time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if `rate` is not positive.
    pub fn at(
        rate: Decimal,
        source: BaselineSource,
        resolved_at: Timestamp,
    ) -> DomainResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(DomainError::InvalidRate(format!(
                "baseline must be positive, got {rate}"
            )));
        }
        Ok(Self {
            rate,
            resolved_at,
            source,
        })
    }

    /// The `1.0` baseline used when nothing else resolves.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            rate: Decimal::ONE,
            resolved_at: Timestamp::now(),
            source: BaselineSource::NeutralDefault,
        }
    }

    /// Returns the rate.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns when the baseline was resolved.
    #[inline]
    #[must_use]
    pub fn resolved_at(&self) -> Timestamp {
        self.resolved_at
    }

    /// Returns which strategy produced the baseline.
    #[inline]
    #[must_use]
    pub fn source(&self) -> BaselineSource {
        self.source
    }

    /// Returns true if margins against this baseline are approximate.
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.source.is_degraded()
    }
}

impl fmt::Display for BaselineRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Baseline({} from {})", self.rate, self.source)
    }
}
