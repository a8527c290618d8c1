//! # Margin Normalization
//!
//! Expresses every quote's rate as a percentage deviation from the run's
//! baseline: `(rate - baseline) / baseline * 100`, rounded to four places.
//! Negative margins are worse than mid-market.

use crate::domain::entities::{BaselineRate, Quote};
use crate::domain::value_objects::ProviderKey;
use rust_decimal::Decimal;

/// Decimal places kept on margin percentages.
pub const MARGIN_SCALE: u32 = 4;

/// Computes the margin of `rate` against `baseline`, in percent.
///
/// # Examples
///
/// ```
/// use remit_compare::domain::services::margin::margin_percentage;
/// use rust_decimal::Decimal;
///
/// let margin = margin_percentage(Decimal::new(1150, 3), Decimal::new(117, 2));
/// assert_eq!(margin, Decimal::new(-17094, 4));
/// ```
#[must_use]
pub fn margin_percentage(rate: Decimal, baseline: Decimal) -> Decimal {
    rate.checked_sub(baseline)
        .and_then(|diff| diff.checked_div(baseline))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, |pct| pct.round_dp(MARGIN_SCALE))
}

/// Stamps baseline and margin onto quotes.
#[derive(Debug, Clone, Default)]
pub struct MarginNormalizer {
    reference_provider: Option<ProviderKey>,
}

impl MarginNormalizer {
    /// Creates a normalizer that pins `reference_provider` to a zero margin.
    #[must_use]
    pub fn new(reference_provider: Option<ProviderKey>) -> Self {
        Self { reference_provider }
    }

    /// Returns the pinned reference provider.
    #[must_use]
    pub fn reference_provider(&self) -> Option<&ProviderKey> {
        self.reference_provider.as_ref()
    }

    /// Sets `base_rate` and `margin_percentage` on every quote.
    pub fn normalize(&self, quotes: &mut [Quote], baseline: &BaselineRate) {
        let base = baseline.rate();
        for quote in quotes.iter_mut() {
            let pinned = self
                .reference_provider
                .as_ref()
                .is_some_and(|key| key == quote.provider_key());
            let margin = if pinned {
                Decimal::ZERO
            } else {
                margin_percentage(quote.rate(), base)
            };
            quote.apply_margin(base, margin);
        }
    }
}
