//! # Synthetic Pricing
//!
//! Quotes for providers that publish no live pricing, computed from
//! per-provider policy tables against the run's baseline.
//!
//! Every synthetic provider is one [`SyntheticProviderPolicy`] value; the
//! tables differ, the arithmetic does not:
//!
//! - effective rate = `baseline * (1 - markup)`
//! - markup and delivery time have a "major pair" tier and an "other" tier
//! - the fee is a step function of the send amount
//!
//! # Examples
//!
//! ```
//! use remit_compare::domain::entities::{BaselineRate, TransferRequest};
//! use remit_compare::domain::services::synthetic_pricing::SyntheticQuoteGenerator;
//! use remit_compare::domain::value_objects::BaselineSource;
//! use rust_decimal::Decimal;
//!
//! let generator = SyntheticQuoteGenerator::with_default_roster();
//! let request = TransferRequest::parse("GBP", "EUR", Decimal::from(1000)).unwrap();
//! let baseline = BaselineRate::new(Decimal::new(117, 2), BaselineSource::ExternalService).unwrap();
//!
//! let quotes = generator.generate(&request, &baseline);
//! assert_eq!(quotes.len(), generator.len());
//! assert!(quotes.iter().all(|q| q.rate() < baseline.rate()));
//! ```

use crate::domain::entities::{BaselineRate, Quote, QuoteBuilder, TransferRequest};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    CurrencyCode, CurrencyPair, ProviderIdentity, Rating, SourceChannel, TransferTime,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Decimal places kept on synthetic rates.
const RATE_SCALE: u32 = 6;

/// Two-tier markup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTiers {
    /// Currencies whose pairs get the lower markup.
    pub major_currencies: Vec<CurrencyCode>,
    /// Fractional markup for major pairs (e.g. `0.004` = 0.4%).
    pub major_markup: Decimal,
    /// Fractional markup for every other pair.
    pub other_markup: Decimal,
}

impl MarkupTiers {
    /// Returns true if both sides of the pair are major currencies.
    #[must_use]
    pub fn is_major_pair(&self, pair: &CurrencyPair) -> bool {
        self.major_currencies.contains(&pair.from()) && self.major_currencies.contains(&pair.to())
    }

    /// Returns the markup for a pair.
    #[must_use]
    pub fn markup_for(&self, pair: &CurrencyPair) -> Decimal {
        if self.is_major_pair(pair) {
            self.major_markup
        } else {
            self.other_markup
        }
    }
}

/// Step-function fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Amounts at or above this threshold transfer for free.
    #[serde(default)]
    pub free_from: Option<Decimal>,
    /// Fee charged below the threshold when no currency override exists.
    pub default_fee: Decimal,
    /// Per-source-currency fee overrides.
    #[serde(default)]
    pub currency_fees: BTreeMap<CurrencyCode, Decimal>,
}

impl FeeSchedule {
    /// A schedule that never charges.
    #[must_use]
    pub fn free() -> Self {
        Self {
            free_from: Some(Decimal::ZERO),
            default_fee: Decimal::ZERO,
            currency_fees: BTreeMap::new(),
        }
    }

    /// Returns the fee for sending `amount` of `currency`.
    #[must_use]
    pub fn fee_for(&self, amount: Decimal, currency: CurrencyCode) -> Decimal {
        if self.free_from.is_some_and(|threshold| amount >= threshold) {
            return Decimal::ZERO;
        }
        self.currency_fees
            .get(&currency)
            .copied()
            .unwrap_or(self.default_fee)
    }
}

/// Two-tier delivery-time table, using the same major-pair test as markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTiers {
    /// Delivery band for major pairs.
    pub major: TransferTime,
    /// Delivery band for every other pair.
    pub other: TransferTime,
}

/// Pricing policy for one provider without live pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticProviderPolicy {
    /// Provider code; becomes the provider key.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Logo reference passed through to the view.
    #[serde(default)]
    pub logo_ref: Option<String>,
    /// Markup table.
    pub markup: MarkupTiers,
    /// Fee table.
    pub fees: FeeSchedule,
    /// Delivery-time table.
    pub delivery: DeliveryTiers,
    /// Rating attached to every generated quote.
    pub starting_rating: Rating,
}

impl SyntheticProviderPolicy {
    /// Checks the policy tables for values that cannot produce a quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if a markup lies outside
    /// `[0, 1)` or a fee is negative.
    pub fn validate(&self) -> DomainResult<()> {
        for markup in [self.markup.major_markup, self.markup.other_markup] {
            if markup < Decimal::ZERO || markup >= Decimal::ONE {
                return Err(DomainError::ValidationError(format!(
                    "{}: markup {markup} must be in [0, 1)",
                    self.code
                )));
            }
        }
        let negative_fee = std::iter::once(&self.fees.default_fee)
            .chain(self.fees.currency_fees.values())
            .any(|fee| *fee < Decimal::ZERO);
        if negative_fee {
            return Err(DomainError::ValidationError(format!(
                "{}: fees must not be negative",
                self.code
            )));
        }
        Ok(())
    }

    /// Computes this provider's quote for a request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the policy produces an invalid quote, which
    /// [`validate`](Self::validate) rules out.
    pub fn quote(&self, request: &TransferRequest, baseline: &BaselineRate) -> DomainResult<Quote> {
        let pair = request.pair();
        let markup = self.markup.markup_for(&pair);
        let rate = baseline
            .rate()
            .checked_mul(Decimal::ONE - markup)
            .ok_or(DomainError::Overflow)?
            .round_dp(RATE_SCALE);
        let fee = self.fees.fee_for(request.amount(), request.from_currency());
        let delivery = if self.markup.is_major_pair(&pair) {
            self.delivery.major.clone()
        } else {
            self.delivery.other.clone()
        };

        let mut builder = QuoteBuilder::new(
            ProviderIdentity::named(self.name.clone()).with_code(self.code.clone()),
            SourceChannel::Synthetic,
            rate,
            request.amount(),
        )
        .source_id("synthetic")
        .transfer_fee(fee)
        .transfer_time(delivery)
        .rating(self.starting_rating);
        if let Some(logo) = &self.logo_ref {
            builder = builder.logo_ref(logo.clone());
        }
        builder.build()
    }
}

/// Generates quotes for a fixed roster of synthetic providers.
#[derive(Debug, Clone, Default)]
pub struct SyntheticQuoteGenerator {
    roster: Vec<SyntheticProviderPolicy>,
}

impl SyntheticQuoteGenerator {
    /// Creates a generator for the given roster.
    #[must_use]
    pub fn new(roster: Vec<SyntheticProviderPolicy>) -> Self {
        Self { roster }
    }

    /// Creates a generator with [`default_roster`].
    #[must_use]
    pub fn with_default_roster() -> Self {
        Self::new(default_roster())
    }

    /// Returns the roster size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// Returns true if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Returns the roster.
    #[must_use]
    pub fn roster(&self) -> &[SyntheticProviderPolicy] {
        &self.roster
    }

    /// Computes one quote per roster entry.
    ///
    /// A policy that cannot price (rejected by its own validation) is
    /// logged and skipped.
    #[must_use]
    pub fn generate(&self, request: &TransferRequest, baseline: &BaselineRate) -> Vec<Quote> {
        self.roster
            .iter()
            .filter_map(|policy| match policy.quote(request, baseline) {
                Ok(quote) => Some(quote),
                Err(e) => {
                    warn!(provider = %policy.code, error = %e, "synthetic policy produced no quote");
                    None
                }
            })
            .collect()
    }
}

fn majors(codes: &[&str]) -> Vec<CurrencyCode> {
    codes
        .iter()
        .filter_map(|code| CurrencyCode::new(code).ok())
        .collect()
}

fn currency_fees(entries: &[(&str, Decimal)]) -> BTreeMap<CurrencyCode, Decimal> {
    entries
        .iter()
        .filter_map(|(code, fee)| CurrencyCode::new(code).ok().map(|c| (c, *fee)))
        .collect()
}

/// Built-in roster of providers without live pricing.
#[must_use]
pub fn default_roster() -> Vec<SyntheticProviderPolicy> {
    let g10 = majors(&["USD", "EUR", "GBP", "CAD", "AUD", "NZD", "CHF", "JPY", "SEK", "NOK"]);

    vec![
        SyntheticProviderPolicy {
            code: "xe".into(),
            name: "XE".into(),
            logo_ref: Some("logos/xe.svg".into()),
            markup: MarkupTiers {
                major_currencies: g10.clone(),
                major_markup: dec!(0.005),
                other_markup: dec!(0.01),
            },
            fees: FeeSchedule {
                free_from: Some(dec!(500)),
                default_fee: dec!(2.00),
                currency_fees: currency_fees(&[("USD", dec!(3.00)), ("EUR", dec!(2.50))]),
            },
            delivery: DeliveryTiers {
                major: TransferTime::within_hours("1-2 business days", 24, 48),
                other: TransferTime::within_hours("2-4 business days", 48, 96),
            },
            starting_rating: Rating::clamped(dec!(4.3)),
        },
        SyntheticProviderPolicy {
            code: "ofx".into(),
            name: "OFX".into(),
            logo_ref: Some("logos/ofx.svg".into()),
            markup: MarkupTiers {
                major_currencies: g10.clone(),
                major_markup: dec!(0.004),
                other_markup: dec!(0.008),
            },
            fees: FeeSchedule {
                free_from: Some(dec!(10000)),
                default_fee: dec!(11.00),
                currency_fees: currency_fees(&[("USD", dec!(15.00)), ("AUD", dec!(15.00))]),
            },
            delivery: DeliveryTiers {
                major: TransferTime::within_hours("1-2 business days", 24, 48),
                other: TransferTime::within_hours("3-5 business days", 72, 120),
            },
            starting_rating: Rating::clamped(dec!(4.4)),
        },
        SyntheticProviderPolicy {
            code: "torfx".into(),
            name: "TorFX".into(),
            logo_ref: Some("logos/torfx.svg".into()),
            markup: MarkupTiers {
                major_currencies: g10.clone(),
                major_markup: dec!(0.006),
                other_markup: dec!(0.012),
            },
            fees: FeeSchedule::free(),
            delivery: DeliveryTiers {
                major: TransferTime::within_hours("Same day", 0, 24),
                other: TransferTime::within_hours("1-3 business days", 24, 72),
            },
            starting_rating: Rating::clamped(dec!(4.8)),
        },
        SyntheticProviderPolicy {
            code: "currencyfair".into(),
            name: "CurrencyFair".into(),
            logo_ref: Some("logos/currencyfair.svg".into()),
            markup: MarkupTiers {
                major_currencies: g10,
                major_markup: dec!(0.0045),
                other_markup: dec!(0.009),
            },
            fees: FeeSchedule {
                free_from: None,
                default_fee: dec!(3.00),
                currency_fees: BTreeMap::new(),
            },
            delivery: DeliveryTiers {
                major: TransferTime::within_hours("1 business day", 0, 24),
                other: TransferTime::within_hours("2-3 business days", 48, 72),
            },
            starting_rating: Rating::clamped(dec!(4.2)),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::value_objects::BaselineSource;

    fn gbp_eur(amount: Decimal) -> TransferRequest {
        TransferRequest::parse("GBP", "EUR", amount).unwrap()
    }

    fn baseline(rate: Decimal) -> BaselineRate {
        BaselineRate::new(rate, BaselineSource::ExternalService).unwrap()
    }

    fn policy() -> SyntheticProviderPolicy {
        SyntheticProviderPolicy {
            code: "acme".into(),
            name: "Acme FX".into(),
            logo_ref: None,
            markup: MarkupTiers {
                major_currencies: majors(&["GBP", "EUR", "USD"]),
                major_markup: dec!(0.004),
                other_markup: dec!(0.01),
            },
            fees: FeeSchedule {
                free_from: Some(dec!(1000)),
                default_fee: dec!(2),
                currency_fees: currency_fees(&[("USD", dec!(3))]),
            },
            delivery: DeliveryTiers {
                major: TransferTime::within_hours("Same day", 0, 24),
                other: TransferTime::described("Up to 5 days"),
            },
            starting_rating: Rating::clamped(dec!(4.1)),
        }
    }

    mod tiers {
        use super::*;

        #[test]
        fn major_pair_needs_both_sides() {
            let tiers = policy().markup;
            let major = gbp_eur(dec!(1)).pair();
            let minor = TransferRequest::parse("GBP", "INR", dec!(1)).unwrap().pair();
            assert!(tiers.is_major_pair(&major));
            assert!(!tiers.is_major_pair(&minor));
            assert_eq!(tiers.markup_for(&major), dec!(0.004));
            assert_eq!(tiers.markup_for(&minor), dec!(0.01));
        }

        #[test]
        fn fee_is_step_function() {
            let fees = policy().fees;
            let gbp = CurrencyCode::new("GBP").unwrap();
            let usd = CurrencyCode::new("USD").unwrap();
            assert_eq!(fees.fee_for(dec!(999.99), gbp), dec!(2));
            assert_eq!(fees.fee_for(dec!(999.99), usd), dec!(3));
            assert_eq!(fees.fee_for(dec!(1000), usd), Decimal::ZERO);
        }

        #[test]
        fn free_schedule_never_charges() {
            let gbp = CurrencyCode::new("GBP").unwrap();
            assert_eq!(FeeSchedule::free().fee_for(dec!(1), gbp), Decimal::ZERO);
        }
    }

    mod quoting {
        use super::*;

        #[test]
        fn major_pair_quote_matches_worked_example() {
            let quote = policy().quote(&gbp_eur(dec!(1000)), &baseline(dec!(1.17))).unwrap();
            assert_eq!(quote.rate(), dec!(1.16532));
            assert_eq!(quote.transfer_fee(), Decimal::ZERO);
            assert_eq!(quote.amount_received(), dec!(1165.32));
            assert_eq!(quote.source_channel(), SourceChannel::Synthetic);
            assert_eq!(quote.provider_key().as_str(), "acme");
            assert_eq!(quote.transfer_time().descriptor(), "Same day");
            assert_eq!(quote.source_rating().map(|r| r.value()), Some(dec!(4.1)));
        }

        #[test]
        fn minor_pair_uses_higher_markup_and_slow_band() {
            let request = TransferRequest::parse("GBP", "INR", dec!(100)).unwrap();
            let quote = policy().quote(&request, &baseline(dec!(100))).unwrap();
            assert_eq!(quote.rate(), dec!(99));
            assert_eq!(quote.transfer_fee(), dec!(2));
            assert_eq!(quote.transfer_time().descriptor(), "Up to 5 days");
        }

        #[test]
        fn generator_skips_invalid_policy() {
            let mut broken = policy();
            broken.code = "broken".into();
            broken.markup.major_markup = dec!(1);
            assert!(broken.validate().is_err());

            let generator = SyntheticQuoteGenerator::new(vec![policy(), broken]);
            let quotes = generator.generate(&gbp_eur(dec!(1000)), &baseline(dec!(1.17)));
            assert_eq!(quotes.len(), 1);
            assert_eq!(quotes[0].provider_key().as_str(), "acme");
        }
    }

    #[test]
    fn default_roster_is_valid_and_distinct() {
        let roster = default_roster();
        assert!(roster.iter().all(|p| p.validate().is_ok()));
        let mut codes: Vec<_> = roster.iter().map(|p| p.code.clone()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), roster.len());
    }

    #[test]
    fn policy_deserializes_from_toml() {
        let text = r#"
            code = "zap"
            name = "Zap"
            starting_rating = 4.0

            [markup]
            major_currencies = ["GBP", "EUR"]
            major_markup = 0.003
            other_markup = 0.007

            [fees]
            default_fee = 1.5
            [fees.currency_fees]
            EUR = 1.0

            [delivery.major]
            descriptor = "Minutes"
            [delivery.other]
            descriptor = "1 day"
        "#;
        let parsed: SyntheticProviderPolicy = toml::from_str(text).unwrap();
        assert_eq!(parsed.code, "zap");
        assert_eq!(parsed.markup.major_markup, dec!(0.003));
        assert!(parsed.fees.free_from.is_none());
        assert_eq!(parsed.fees.currency_fees.len(), 1);
        assert!(parsed.validate().is_ok());
    }
}
