//! # Rating Record
//!
//! A cached rating for one provider, shared across aggregation runs.

use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{Rating, RatingProvenance};
use serde::{Deserialize, Serialize};

/// A rating remembered for a provider key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    value: Rating,
    provenance: RatingProvenance,
    recorded_at: Timestamp,
}

impl RatingRecord {
    /// Creates a record stamped now.
    #[must_use]
    pub fn new(value: Rating, provenance: RatingProvenance) -> Self {
        Self {
            value,
            provenance,
            recorded_at: Timestamp::now(),
        }
    }

    /// Creates a rendering-layer confirmation stamped now.
    #[must_use]
    pub fn confirmed(value: Rating) -> Self {
        Self::new(value, RatingProvenance::ConfirmedByView)
    }

    /// Returns the rating.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Rating {
        self.value
    }

    /// Returns which tier produced the rating.
    #[inline]
    #[must_use]
    pub fn provenance(&self) -> RatingProvenance {
        self.provenance
    }

    /// Returns when the record was written.
    #[inline]
    #[must_use]
    pub fn recorded_at(&self) -> Timestamp {
        self.recorded_at
    }

    /// Returns true if the rendering layer confirmed this rating.
    #[inline]
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.provenance.is_confirmed()
    }
}
