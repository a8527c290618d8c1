//! # Static Rate Table
//!
//! Built-in approximations for major pairs, used when neither the reference
//! provider nor the rate feed produced a baseline. Lookups try the direct
//! pair first, then the reciprocal of the inverse pair.

use crate::domain::value_objects::{CurrencyCode, CurrencyPair};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Decimal places kept on reciprocal rates.
const RECIPROCAL_SCALE: u32 = 6;

/// Read-only table of approximate mid-market rates.
#[derive(Debug, Clone, Default)]
pub struct StaticRateTable {
    rates: HashMap<CurrencyPair, Decimal>,
}

impl StaticRateTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the built-in table.
    #[must_use]
    pub fn with_defaults() -> Self {
        let entries = [
            ("USD", "EUR", dec!(0.92)),
            ("USD", "GBP", dec!(0.79)),
            ("EUR", "GBP", dec!(0.86)),
            ("GBP", "EUR", dec!(1.17)),
            ("USD", "JPY", dec!(150.0)),
            ("USD", "CAD", dec!(1.36)),
            ("USD", "AUD", dec!(1.52)),
            ("USD", "CHF", dec!(0.88)),
            ("EUR", "CHF", dec!(0.96)),
            ("USD", "INR", dec!(83.0)),
            ("GBP", "INR", dec!(105.0)),
            ("USD", "MXN", dec!(17.0)),
            ("USD", "PHP", dec!(56.0)),
            ("USD", "NGN", dec!(1500.0)),
            ("EUR", "PLN", dec!(4.30)),
        ];
        let mut table = Self::new();
        for (from, to, rate) in entries {
            table.insert_codes(from, to, rate);
        }
        table
    }

    fn insert_codes(&mut self, from: &str, to: &str, rate: Decimal) {
        if let (Ok(from), Ok(to)) = (CurrencyCode::new(from), CurrencyCode::new(to))
            && let Ok(pair) = CurrencyPair::new(from, to)
        {
            self.insert(pair, rate);
        }
    }

    /// Adds or replaces a rate. Non-positive rates are ignored.
    pub fn insert(&mut self, pair: CurrencyPair, rate: Decimal) {
        if rate > Decimal::ZERO {
            self.rates.insert(pair, rate);
        }
    }

    /// Looks up a pair directly or through its reciprocal.
    #[must_use]
    pub fn lookup(&self, pair: &CurrencyPair) -> Option<Decimal> {
        if let Some(rate) = self.rates.get(pair) {
            return Some(*rate);
        }
        self.rates
            .get(&pair.inverse())
            .and_then(|inverse| Decimal::ONE.checked_div(*inverse))
            .map(|rate| rate.round_dp(RECIPROCAL_SCALE))
    }

    /// Returns the number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
