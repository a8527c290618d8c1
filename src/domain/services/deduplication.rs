//! # Quote Deduplication
//!
//! Collapses quotes sharing a provider key to one survivor per key.
//!
//! The survivor is the quote from the highest-priority channel
//! ([`SourceChannel::priority`]); on equal priority the earlier quote
//! stays. The survivor occupies the position of the key's first
//! occurrence, so output order is the input order minus losers.

use crate::domain::entities::Quote;
use crate::domain::value_objects::ProviderKey;
use std::collections::HashMap;

/// Result of a deduplication pass.
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    /// One quote per provider key.
    pub quotes: Vec<Quote>,
    /// Number of quotes dropped.
    pub collapsed: usize,
}

/// Keeps exactly one quote per provider key.
///
/// # Examples
///
/// ```
/// use remit_compare::domain::entities::QuoteBuilder;
/// use remit_compare::domain::services::deduplication::deduplicate;
/// use remit_compare::domain::value_objects::{ProviderIdentity, SourceChannel};
/// use rust_decimal::Decimal;
///
/// let generic = QuoteBuilder::new(ProviderIdentity::named("Wise"), SourceChannel::GenericAggregator, Decimal::new(115, 2), Decimal::from(1000)).build().unwrap();
/// let live = QuoteBuilder::new(ProviderIdentity::named("Wise"), SourceChannel::DedicatedLive, Decimal::new(116, 2), Decimal::from(1000)).build().unwrap();
///
/// let outcome = deduplicate(vec![generic, live]);
/// assert_eq!(outcome.quotes.len(), 1);
/// assert_eq!(outcome.quotes[0].source_channel(), SourceChannel::DedicatedLive);
/// ```
#[must_use]
pub fn deduplicate(quotes: Vec<Quote>) -> DedupOutcome {
    let mut survivors: Vec<Quote> = Vec::with_capacity(quotes.len());
    let mut slots: HashMap<ProviderKey, usize> = HashMap::with_capacity(quotes.len());
    let mut collapsed = 0;

    for quote in quotes {
        match slots.get(quote.provider_key()) {
            Some(&slot) => {
                collapsed += 1;
                if let Some(existing) = survivors.get_mut(slot)
                    && quote.source_channel().priority() > existing.source_channel().priority()
                {
                    *existing = quote;
                }
            }
            None => {
                slots.insert(quote.provider_key().clone(), survivors.len());
                survivors.push(quote);
            }
        }
    }

    DedupOutcome {
        quotes: survivors,
        collapsed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::QuoteBuilder;
    use crate::domain::value_objects::{ProviderIdentity, SourceChannel};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn quote(name: &str, channel: SourceChannel, rate: Decimal) -> Quote {
        QuoteBuilder::new(ProviderIdentity::named(name), channel, rate, dec!(1000))
            .build()
            .unwrap()
    }

    fn keys(outcome: &DedupOutcome) -> Vec<&str> {
        outcome
            .quotes
            .iter()
            .map(|q| q.provider_key().as_str())
            .collect()
    }

    #[test]
    fn dedicated_beats_generic_in_either_order() {
        for reversed in [false, true] {
            let mut input = vec![
                quote("Wise", SourceChannel::GenericAggregator, dec!(1.15)),
                quote("Wise", SourceChannel::DedicatedLive, dec!(1.16)),
            ];
            if reversed {
                input.reverse();
            }
            let outcome = deduplicate(input);
            assert_eq!(outcome.quotes.len(), 1);
            assert_eq!(outcome.quotes[0].rate(), dec!(1.16));
            assert_eq!(outcome.collapsed, 1);
        }
    }

    #[test]
    fn generic_beats_synthetic() {
        let outcome = deduplicate(vec![
            quote("XE", SourceChannel::Synthetic, dec!(1.10)),
            quote("XE", SourceChannel::GenericAggregator, dec!(1.12)),
        ]);
        assert_eq!(outcome.quotes[0].source_channel(), SourceChannel::GenericAggregator);
    }

    #[test]
    fn equal_priority_keeps_first() {
        let outcome = deduplicate(vec![
            quote("Remitly", SourceChannel::GenericAggregator, dec!(1.11)),
            quote("remitly", SourceChannel::GenericAggregator, dec!(1.19)),
        ]);
        assert_eq!(outcome.quotes.len(), 1);
        assert_eq!(outcome.quotes[0].rate(), dec!(1.11));
    }

    #[test]
    fn survivor_takes_first_position() {
        let outcome = deduplicate(vec![
            quote("A", SourceChannel::GenericAggregator, dec!(1.1)),
            quote("B", SourceChannel::GenericAggregator, dec!(1.1)),
            quote("C", SourceChannel::Synthetic, dec!(1.1)),
            quote("A", SourceChannel::DedicatedLive, dec!(1.2)),
        ]);
        assert_eq!(keys(&outcome), vec!["a", "b", "c"]);
        assert_eq!(outcome.quotes[0].source_channel(), SourceChannel::DedicatedLive);
    }

    #[test]
    fn empty_input() {
        let outcome = deduplicate(Vec::new());
        assert!(outcome.quotes.is_empty());
        assert_eq!(outcome.collapsed, 0);
    }
}
