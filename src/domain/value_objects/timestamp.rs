//! # Timestamp
//!
//! UTC instants for baseline resolution, quote arrival and rating records.
//!
//! Rate feeds report their observation time either as Unix seconds or as
//! RFC 3339 text; both parse into the same [`Timestamp`].

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A UTC instant.
///
/// # Examples
///
/// ```
/// use remit_compare::domain::value_objects::timestamp::Timestamp;
///
/// let observed = Timestamp::parse_rfc3339("2024-01-01T00:00:00Z").unwrap();
/// assert_eq!(Timestamp::from_secs(1_704_067_200), Some(observed));
/// assert!(observed.elapsed_ms() > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// From Unix seconds; `None` when out of chrono's range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Parses RFC 3339 text in any offset, normalized to UTC.
    #[must_use]
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value.trim())
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Time since this instant, zero for instants in the future.
    #[must_use]
    pub fn age(&self) -> Duration {
        (Utc::now() - self.0).to_std().unwrap_or(Duration::ZERO)
    }

    /// [`Self::age`] in whole milliseconds, saturating.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.age().as_millis()).unwrap_or(u64::MAX)
    }

    /// ISO 8601 rendering used on the wire.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
