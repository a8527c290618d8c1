//! # Ranking Engine
//!
//! Stable single-key sorting of quotes and best-deal selection.
//!
//! Both directions are stable sorts on the criterion's key, so quotes with
//! equal keys keep their input order whichever way the list is sorted.
//! Where all keys are distinct, the descending result is the ascending one
//! reversed.

use crate::domain::entities::Quote;
use crate::domain::value_objects::{ProviderKey, Rating, SortCriterion, SortDirection};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Sorts quotes by a single criterion.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine;

impl RankingEngine {
    /// Creates a ranking engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the sort key of a quote.
    ///
    /// For [`SortCriterion::Rating`] a confirmed value from `confirmed`
    /// takes precedence over the quote's own rating; unrated quotes sort
    /// as zero.
    #[must_use]
    pub fn sort_key(
        quote: &Quote,
        criterion: SortCriterion,
        confirmed: &HashMap<ProviderKey, Rating>,
    ) -> Decimal {
        match criterion {
            SortCriterion::Amount => quote.amount_received(),
            SortCriterion::Rate => quote.rate(),
            SortCriterion::Fees => quote.transfer_fee(),
            SortCriterion::Rating => confirmed
                .get(quote.provider_key())
                .copied()
                .or_else(|| quote.rating())
                .map_or(Decimal::ZERO, |rating| rating.value()),
        }
    }

    /// Sorts quotes.
    #[must_use]
    pub fn sort(
        &self,
        quotes: Vec<Quote>,
        criterion: SortCriterion,
        direction: SortDirection,
        confirmed: &HashMap<ProviderKey, Rating>,
    ) -> Vec<Quote> {
        let mut keyed: Vec<(Decimal, Quote)> = quotes
            .into_iter()
            .map(|quote| (Self::sort_key(&quote, criterion, confirmed), quote))
            .collect();
        match direction {
            SortDirection::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
            SortDirection::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        }
        keyed.into_iter().map(|(_, quote)| quote).collect()
    }

    /// Returns the quote with the highest amount received, the earliest on
    /// ties. Independent of any sort criterion.
    #[must_use]
    pub fn best_deal(quotes: &[Quote]) -> Option<&Quote> {
        let mut best: Option<&Quote> = None;
        for quote in quotes {
            if best.is_none_or(|current| quote.amount_received() > current.amount_received()) {
                best = Some(quote);
            }
        }
        best
    }
}
