//! # Transfer Time
//!
//! Delivery-time descriptor carried by every quote.
//!
//! The descriptor text is opaque and shown as-is; the optional hour range
//! makes delivery times comparable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive delivery window in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoursRange {
    /// Fastest expected delivery.
    pub min_hours: u32,
    /// Slowest expected delivery.
    pub max_hours: u32,
}

impl HoursRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(min_hours: u32, max_hours: u32) -> Self {
        Self {
            min_hours: min_hours.min(max_hours),
            max_hours: min_hours.max(max_hours),
        }
    }
}

/// Human-readable delivery time plus an optional numeric window.
///
/// # Examples
///
/// ```
/// use remit_compare::domain::value_objects::transfer_time::TransferTime;
///
/// let time = TransferTime::within_hours("Same day", 0, 24);
/// assert_eq!(time.to_string(), "Same day");
/// assert_eq!(time.range().map(|r| r.max_hours), Some(24));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransferTime {
    descriptor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<HoursRange>,
}

impl TransferTime {
    /// Creates a descriptor with no numeric window.
    #[must_use]
    pub fn described(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            range: None,
        }
    }

    /// Creates a descriptor with a numeric window.
    #[must_use]
    pub fn within_hours(descriptor: impl Into<String>, min_hours: u32, max_hours: u32) -> Self {
        Self {
            descriptor: descriptor.into(),
            range: Some(HoursRange::new(min_hours, max_hours)),
        }
    }

    /// Returns the descriptor text.
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Returns the numeric window, if known.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Option<HoursRange> {
        self.range
    }
}

impl fmt::Display for TransferTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}
