//! # Transfer Request
//!
//! The `(from, to, amount)` triple every aggregation run is keyed by.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CurrencyCode, CurrencyPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated comparison request.
///
/// # Invariants
///
/// - Source and destination currencies differ
/// - `amount > 0`
///
/// # Examples
///
/// ```
/// use remit_compare::domain::entities::transfer_request::TransferRequest;
/// use rust_decimal::Decimal;
///
/// let request = TransferRequest::parse("gbp", "eur", Decimal::from(1000)).unwrap();
/// assert_eq!(request.to_string(), "1000 GBP -> EUR");
/// assert!(TransferRequest::parse("GBP", "GBP", Decimal::ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferRequest {
    pair: CurrencyPair,
    amount: Decimal,
}

impl TransferRequest {
    /// Creates a request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is not positive.
    pub fn new(pair: CurrencyPair, amount: Decimal) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "amount must be positive, got {amount}"
            )));
        }
        Ok(Self { pair, amount })
    }

    /// Parses currency codes and builds a request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` for invalid codes, identical currencies or a
    /// non-positive amount.
    pub fn parse(from: &str, to: &str, amount: Decimal) -> DomainResult<Self> {
        let pair = CurrencyPair::new(CurrencyCode::new(from)?, CurrencyCode::new(to)?)?;
        Self::new(pair, amount)
    }

    /// Returns the currency pair.
    #[inline]
    #[must_use]
    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    /// Returns the source currency.
    #[inline]
    #[must_use]
    pub fn from_currency(&self) -> CurrencyCode {
        self.pair.from()
    }

    /// Returns the destination currency.
    #[inline]
    #[must_use]
    pub fn to_currency(&self) -> CurrencyCode {
        self.pair.to()
    }

    /// Returns the send amount in source currency.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.amount, self.pair.from(), self.pair.to())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amount() {
        assert!(TransferRequest::parse("GBP", "EUR", Decimal::ZERO).is_err());
        assert!(TransferRequest::parse("GBP", "EUR", Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn rejects_bad_currency() {
        assert!(TransferRequest::parse("GB", "EUR", Decimal::ONE).is_err());
    }
}
