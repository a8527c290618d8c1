//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`SourceChannel`] - Where a quote came from (and its merge priority)
//! - [`RatingProvenance`] - Which rating tier produced a rating
//! - [`BaselineSource`] - Which strategy produced the baseline rate
//! - [`SortCriterion`] - Sortable quote attribute
//! - [`SortDirection`] - Ascending or descending
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of source that produced a quote.
///
/// Doubles as the deduplication priority: a dedicated live endpoint beats
/// the generic aggregator, which beats a synthetic estimate.
///
/// # Examples
///
/// ```
/// use remit_compare::domain::value_objects::enums::SourceChannel;
///
/// assert!(SourceChannel::DedicatedLive.priority() > SourceChannel::GenericAggregator.priority());
/// assert_eq!(SourceChannel::Synthetic.to_string(), "synthetic");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum SourceChannel {
    /// A provider's own pricing endpoint.
    DedicatedLive = 0,
    /// A multi-provider aggregator endpoint.
    GenericAggregator = 1,
    /// Computed locally from policy tables.
    Synthetic = 2,
}

impl SourceChannel {
    /// Returns the merge priority (higher wins).
    #[inline]
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::DedicatedLive => 2,
            Self::GenericAggregator => 1,
            Self::Synthetic => 0,
        }
    }

    /// Returns true if the price was confirmed in real time by the provider.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::DedicatedLive)
    }
}

impl fmt::Display for SourceChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DedicatedLive => write!(f, "dedicated-live"),
            Self::GenericAggregator => write!(f, "generic-aggregator"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

impl FromStr for SourceChannel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "dedicated-live" | "dedicated" => Ok(Self::DedicatedLive),
            "generic-aggregator" | "aggregator" => Ok(Self::GenericAggregator),
            "synthetic" => Ok(Self::Synthetic),
            _ => Err(ParseEnumError::InvalidValue("SourceChannel", s.to_string())),
        }
    }
}

/// The rating tier that produced a quote's rating.
///
/// Variants are declared from highest to lowest trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum RatingProvenance {
    /// Reported back by the rendering layer.
    ConfirmedByView = 0,
    /// Found in the static provider-rating reference map.
    StaticMap = 1,
    /// Pinned in the hardcoded override table.
    HardcodedOverride = 2,
    /// Per-provider default or a rating the source attached.
    ProviderDefault = 3,
    /// Neutral fallback value.
    GenericFallback = 4,
}

impl RatingProvenance {
    /// Returns the trust rank (0 = most trusted).
    #[inline]
    #[must_use]
    pub const fn trust_rank(self) -> u8 {
        self as u8
    }

    /// Returns true if the rating was confirmed by the rendering layer.
    #[inline]
    #[must_use]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::ConfirmedByView)
    }
}

impl fmt::Display for RatingProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfirmedByView => write!(f, "confirmed-by-view"),
            Self::StaticMap => write!(f, "static-map"),
            Self::HardcodedOverride => write!(f, "hardcoded-override"),
            Self::ProviderDefault => write!(f, "provider-default"),
            Self::GenericFallback => write!(f, "generic-fallback"),
        }
    }
}

/// The strategy that produced a run's baseline rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaselineSource {
    /// The reference provider's own live quote.
    ReferenceProvider,
    /// An external mid-market rate feed.
    ExternalService,
    /// Built-in approximation table.
    StaticApproximation,
    /// `1.0`, used when nothing else resolved.
    NeutralDefault,
}

impl BaselineSource {
    /// Returns true if margins against this baseline are of degraded accuracy.
    #[inline]
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::StaticApproximation | Self::NeutralDefault)
    }
}

impl fmt::Display for BaselineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceProvider => write!(f, "reference-provider"),
            Self::ExternalService => write!(f, "external-service"),
            Self::StaticApproximation => write!(f, "static-approximation"),
            Self::NeutralDefault => write!(f, "neutral-default"),
        }
    }
}

/// A quote attribute the ranking engine can sort by.
///
/// # Examples
///
/// ```
/// use remit_compare::domain::value_objects::enums::{SortCriterion, SortDirection};
///
/// assert_eq!(SortCriterion::Fees.default_direction(), SortDirection::Asc);
/// assert_eq!(SortCriterion::Amount.default_direction(), SortDirection::Desc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    /// Amount the recipient receives.
    #[default]
    Amount,
    /// Effective exchange rate.
    Rate,
    /// Transfer fee.
    Fees,
    /// Resolved provider rating.
    Rating,
}

impl SortCriterion {
    /// Returns the direction that puts the best quote first.
    #[inline]
    #[must_use]
    pub const fn default_direction(self) -> SortDirection {
        match self {
            Self::Fees => SortDirection::Asc,
            Self::Amount | Self::Rate | Self::Rating => SortDirection::Desc,
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount => write!(f, "amount"),
            Self::Rate => write!(f, "rate"),
            Self::Fees => write!(f, "fees"),
            Self::Rating => write!(f, "rating"),
        }
    }
}

impl FromStr for SortCriterion {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amount" => Ok(Self::Amount),
            "rate" => Ok(Self::Rate),
            "fees" | "fee" => Ok(Self::Fees),
            "rating" => Ok(Self::Rating),
            _ => Err(ParseEnumError::InvalidValue("SortCriterion", s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest key first.
    Asc,
    /// Largest key first.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseEnumError::InvalidValue("SortDirection", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod source_channel {
        use super::*;

        #[test]
        fn priority_order() {
            assert!(SourceChannel::DedicatedLive.priority() > SourceChannel::GenericAggregator.priority());
            assert!(SourceChannel::GenericAggregator.priority() > SourceChannel::Synthetic.priority());
        }

        #[test]
        fn only_dedicated_is_live() {
            assert!(SourceChannel::DedicatedLive.is_live());
            assert!(!SourceChannel::GenericAggregator.is_live());
            assert!(!SourceChannel::Synthetic.is_live());
        }

        #[test]
        fn from_str_works() {
            assert_eq!(
                "dedicated_live".parse::<SourceChannel>().unwrap(),
                SourceChannel::DedicatedLive
            );
            assert_eq!(
                "Generic-Aggregator".parse::<SourceChannel>().unwrap(),
                SourceChannel::GenericAggregator
            );
            assert!("carrier-pigeon".parse::<SourceChannel>().is_err());
        }

        #[test]
        fn serde_kebab_case() {
            let json = serde_json::to_string(&SourceChannel::GenericAggregator).unwrap();
            assert_eq!(json, "\"generic-aggregator\"");
        }
    }

    mod rating_provenance {
        use super::*;

        #[test]
        fn confirmed_is_most_trusted() {
            assert_eq!(RatingProvenance::ConfirmedByView.trust_rank(), 0);
            assert!(RatingProvenance::ConfirmedByView.is_confirmed());
            assert!(!RatingProvenance::StaticMap.is_confirmed());
            assert!(
                RatingProvenance::HardcodedOverride.trust_rank()
                    < RatingProvenance::GenericFallback.trust_rank()
            );
        }

        #[test]
        fn display() {
            assert_eq!(RatingProvenance::GenericFallback.to_string(), "generic-fallback");
        }
    }

    mod sorting {
        use super::*;

        #[test]
        fn fees_default_ascending() {
            assert_eq!(SortCriterion::Fees.default_direction(), SortDirection::Asc);
            assert_eq!(SortCriterion::Rate.default_direction(), SortDirection::Desc);
            assert_eq!(SortCriterion::Rating.default_direction(), SortDirection::Desc);
        }

        #[test]
        fn parse_criterion_and_direction() {
            assert_eq!("FEES".parse::<SortCriterion>().unwrap(), SortCriterion::Fees);
            assert_eq!("descending".parse::<SortDirection>().unwrap(), SortDirection::Desc);
            assert!("speed".parse::<SortCriterion>().is_err());
        }

        #[test]
        fn reversed_direction() {
            assert_eq!(SortDirection::Asc.reversed(), SortDirection::Desc);
            assert_eq!(SortDirection::Desc.reversed(), SortDirection::Asc);
        }
    }

    #[test]
    fn baseline_degraded_flag() {
        assert!(!BaselineSource::ReferenceProvider.is_degraded());
        assert!(!BaselineSource::ExternalService.is_degraded());
        assert!(BaselineSource::StaticApproximation.is_degraded());
        assert!(BaselineSource::NeutralDefault.is_degraded());
    }
}
