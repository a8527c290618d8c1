//! # Quote Entity
//!
//! One provider's offer for a transfer request.
//!
//! # Examples
//!
//! ```
//! use remit_compare::domain::entities::quote::QuoteBuilder;
//! use remit_compare::domain::value_objects::{ProviderIdentity, SourceChannel};
//! use rust_decimal::Decimal;
//!
//! let quote = QuoteBuilder::new(
//!     ProviderIdentity::named("Wise"),
//!     SourceChannel::DedicatedLive,
//!     Decimal::new(1165, 3),
//!     Decimal::from(1000),
//! )
//! .build()
//! .unwrap();
//!
//! assert_eq!(quote.provider_key().as_str(), "wise");
//! assert_eq!(quote.amount_received(), Decimal::new(1165, 0));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    ProviderIdentity, ProviderKey, QuoteId, Rating, RatingProvenance, SourceChannel, TransferTime,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider's transfer offer.
///
/// # Invariants
///
/// - `rate > 0`, `transfer_fee >= 0`, `send_amount > 0`
/// - `amount_received` is never stored; it is always derived from
///   `(send_amount, transfer_fee, rate)`
/// - `rating` and `rating_provenance` are set together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    id: QuoteId,
    provider_key: ProviderKey,
    identity: ProviderIdentity,
    logo_ref: Option<String>,
    source_channel: SourceChannel,
    source_id: String,
    rate: Decimal,
    base_rate: Option<Decimal>,
    margin_percentage: Decimal,
    transfer_fee: Decimal,
    send_amount: Decimal,
    transfer_time: TransferTime,
    source_rating: Option<Rating>,
    rating: Option<Rating>,
    rating_provenance: Option<RatingProvenance>,
    received_at: Timestamp,
}

impl Quote {
    /// Returns a builder for constructing a quote.
    #[must_use]
    pub fn builder(
        identity: ProviderIdentity,
        source_channel: SourceChannel,
        rate: Decimal,
        send_amount: Decimal,
    ) -> QuoteBuilder {
        QuoteBuilder::new(identity, source_channel, rate, send_amount)
    }

    /// Returns the quote ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Returns the normalized provider key.
    #[inline]
    #[must_use]
    pub fn provider_key(&self) -> &ProviderKey {
        &self.provider_key
    }

    /// Returns the raw identity reported by the source.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    /// Returns the provider display name.
    #[inline]
    #[must_use]
    pub fn provider_name(&self) -> &str {
        &self.identity.name
    }

    /// Returns the logo reference.
    #[inline]
    #[must_use]
    pub fn logo_ref(&self) -> Option<&str> {
        self.logo_ref.as_deref()
    }

    /// Returns the channel this quote arrived through.
    #[inline]
    #[must_use]
    pub fn source_channel(&self) -> SourceChannel {
        self.source_channel
    }

    /// Returns the id of the source that produced this quote.
    #[inline]
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Returns the effective rate (destination units per source unit).
    #[inline]
    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns the baseline the margin was computed against.
    #[inline]
    #[must_use]
    pub fn base_rate(&self) -> Option<Decimal> {
        self.base_rate
    }

    /// Returns the signed margin in percent; positive beats the baseline.
    #[inline]
    #[must_use]
    pub fn margin_percentage(&self) -> Decimal {
        self.margin_percentage
    }

    /// Returns the transfer fee in source currency.
    #[inline]
    #[must_use]
    pub fn transfer_fee(&self) -> Decimal {
        self.transfer_fee
    }

    /// Returns the requested send amount in source currency.
    #[inline]
    #[must_use]
    pub fn send_amount(&self) -> Decimal {
        self.send_amount
    }

    /// Returns the delivery-time descriptor.
    #[inline]
    #[must_use]
    pub fn transfer_time(&self) -> &TransferTime {
        &self.transfer_time
    }

    /// Returns the rating the source attached, if any.
    #[inline]
    #[must_use]
    pub fn source_rating(&self) -> Option<Rating> {
        self.source_rating
    }

    /// Returns the resolved rating, if any.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Returns which tier produced the rating.
    #[inline]
    #[must_use]
    pub fn rating_provenance(&self) -> Option<RatingProvenance> {
        self.rating_provenance
    }

    /// Returns when the quote was received.
    #[inline]
    #[must_use]
    pub fn received_at(&self) -> Timestamp {
        self.received_at
    }

    /// Returns the amount the recipient gets: `(send_amount - fee) * rate`,
    /// floored at zero. The arithmetic is checked at build time, so the
    /// zero fallback is never taken for a built quote.
    #[must_use]
    pub fn amount_received(&self) -> Decimal {
        self.send_amount
            .checked_sub(self.transfer_fee)
            .and_then(|net| net.checked_mul(self.rate))
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }

    /// Records the margin computed against `base_rate`.
    pub fn apply_margin(&mut self, base_rate: Decimal, margin_percentage: Decimal) {
        self.base_rate = Some(base_rate);
        self.margin_percentage = margin_percentage;
    }

    /// Assigns a resolved rating together with its provenance.
    pub fn assign_rating(&mut self, rating: Rating, provenance: RatingProvenance) {
        self.rating = Some(rating);
        self.rating_provenance = Some(provenance);
    }

    fn validate(rate: Decimal, fee: Decimal, send_amount: Decimal) -> DomainResult<()> {
        if rate <= Decimal::ZERO {
            return Err(DomainError::InvalidRate(format!(
                "rate must be positive, got {rate}"
            )));
        }
        if fee < Decimal::ZERO {
            return Err(DomainError::InvalidFee(format!(
                "fee must not be negative, got {fee}"
            )));
        }
        if send_amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "amount must be positive, got {send_amount}"
            )));
        }
        send_amount
            .checked_sub(fee)
            .and_then(|net| net.checked_mul(rate))
            .ok_or(DomainError::Overflow)?;
        Ok(())
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} @ {} fee={} via {})",
            self.provider_key, self.rate, self.transfer_fee, self.source_channel
        )
    }
}

/// Builder for constructing [`Quote`] instances.
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    identity: ProviderIdentity,
    position: usize,
    source_channel: SourceChannel,
    source_id: Option<String>,
    rate: Decimal,
    send_amount: Decimal,
    transfer_fee: Decimal,
    logo_ref: Option<String>,
    transfer_time: TransferTime,
    rating: Option<Rating>,
}

impl QuoteBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(
        identity: ProviderIdentity,
        source_channel: SourceChannel,
        rate: Decimal,
        send_amount: Decimal,
    ) -> Self {
        Self {
            identity,
            position: 0,
            source_channel,
            source_id: None,
            rate,
            send_amount,
            transfer_fee: Decimal::ZERO,
            logo_ref: None,
            transfer_time: TransferTime::default(),
            rating: None,
        }
    }

    /// Sets the entry's position in its source payload, used for the
    /// positional provider key fallback.
    #[must_use]
    pub fn position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Sets the producing source id.
    #[must_use]
    pub fn source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Sets the transfer fee.
    #[must_use]
    pub fn transfer_fee(mut self, fee: Decimal) -> Self {
        self.transfer_fee = fee;
        self
    }

    /// Sets the logo reference.
    #[must_use]
    pub fn logo_ref(mut self, logo_ref: impl Into<String>) -> Self {
        self.logo_ref = Some(logo_ref.into());
        self
    }

    /// Sets the delivery-time descriptor.
    #[must_use]
    pub fn transfer_time(mut self, transfer_time: TransferTime) -> Self {
        self.transfer_time = transfer_time;
        self
    }

    /// Sets a rating supplied by the source; kept apart from the resolved
    /// rating.
    #[must_use]
    pub fn rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Builds the quote with validation.
    ///
    /// A rating supplied by the source is kept as `source_rating`; the
    /// resolved rating stays unset until the rating resolver runs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the rate, fee or amount is invalid, or
    /// `DomainError::Overflow` if the received amount does not fit a
    /// `Decimal`.
    pub fn build(self) -> DomainResult<Quote> {
        Quote::validate(self.rate, self.transfer_fee, self.send_amount)?;

        let provider_key = ProviderKey::derive(&self.identity, self.position);
        let source_id = self
            .source_id
            .unwrap_or_else(|| self.source_channel.to_string());

        Ok(Quote {
            id: QuoteId::new_v4(),
            provider_key,
            identity: self.identity,
            logo_ref: self.logo_ref,
            source_channel: self.source_channel,
            source_id,
            rate: self.rate,
            base_rate: None,
            margin_percentage: Decimal::ZERO,
            transfer_fee: self.transfer_fee,
            send_amount: self.send_amount,
            transfer_time: self.transfer_time,
            source_rating: self.rating,
            rating: None,
            rating_provenance: None,
            received_at: Timestamp::now(),
        })
    }
}
