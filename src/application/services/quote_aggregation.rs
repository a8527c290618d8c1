//! # Quote Aggregation Engine
//!
//! Orchestrates one comparison run end to end.
//!
//! This module provides the [`QuoteAggregationEngine`] which coordinates
//! concurrent quote collection with the baseline fetch, then runs the
//! collected set through synthetic generation, deduplication, margin
//! normalization and rating resolution.
//!
//! # Pipeline
//!
//! ```text
//! collect ‖ fetch_external
//!        │
//!        ▼
//! resolve baseline ─► synthetic quotes ─► dedup ─► margins ─► ratings ─► best deal
//! ```
//!
//! Sorting is a separate call so a consumer can re-sort after rating
//! confirmations arrive without re-running the pipeline.

use crate::application::error::{AggregationError, ApplicationResult};
use crate::application::services::baseline_resolver::BaselineResolver;
use crate::application::services::collector::ProviderResultCollector;
use crate::application::services::ranking::RankingEngine;
use crate::application::services::rating_resolver::RatingResolver;
use crate::domain::entities::{BaselineRate, Quote, TransferRequest};
use crate::domain::services::{MarginNormalizer, SyntheticQuoteGenerator, deduplicate};
use crate::domain::value_objects::{
    ProviderKey, Rating, RunId, SortCriterion, SortDirection, Timestamp,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Counters describing one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationStats {
    /// Identifier of the run, for log correlation.
    pub run_id: RunId,
    /// Number of sources polled.
    pub sources_queried: usize,
    /// Number of sources that answered.
    pub sources_responded: usize,
    /// Identifiers of sources that failed.
    pub failed_sources: Vec<String>,
    /// Aggregator quotes dropped in favour of a dedicated source.
    pub prefiltered: usize,
    /// Synthetic quotes appended.
    pub synthetic_added: usize,
    /// True when sources answered but only synthetic quotes survived.
    pub synthetic_only: bool,
    /// Duplicates removed by the deduplicator.
    pub duplicates_collapsed: usize,
    /// Quotes in the final set.
    pub quote_count: usize,
    /// When the run started.
    pub started_at: Timestamp,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

/// Result of a successful aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    /// Deduplicated, rated quotes in pipeline order.
    pub quotes: Vec<Quote>,
    /// The quote with the highest amount received.
    pub best_deal: Quote,
    /// Baseline every margin was measured against.
    pub baseline: BaselineRate,
    /// Run counters.
    pub stats: AggregationStats,
}

impl AggregationOutcome {
    /// Returns true if margins were measured against a degraded baseline
    /// or no source supplied a real quote.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.baseline.is_degraded() || self.stats.synthetic_only
    }
}

/// Engine for collecting, normalizing and ranking transfer quotes.
#[derive(Debug, Clone)]
pub struct QuoteAggregationEngine {
    collector: ProviderResultCollector,
    baseline: BaselineResolver,
    synthetic: SyntheticQuoteGenerator,
    margins: MarginNormalizer,
    ratings: RatingResolver,
    ranking: RankingEngine,
}

impl QuoteAggregationEngine {
    /// Creates a new engine.
    ///
    /// The margin normalizer pins the baseline resolver's reference
    /// provider, so both always agree on which provider that is.
    #[must_use]
    pub fn new(
        collector: ProviderResultCollector,
        baseline: BaselineResolver,
        synthetic: SyntheticQuoteGenerator,
        ratings: RatingResolver,
    ) -> Self {
        let margins = MarginNormalizer::new(baseline.reference_provider().cloned());
        Self {
            collector,
            baseline,
            synthetic,
            margins,
            ratings,
            ranking: RankingEngine::new(),
        }
    }

    /// Returns the collector.
    #[must_use]
    pub fn collector(&self) -> &ProviderResultCollector {
        &self.collector
    }

    /// Returns the rating resolver.
    #[must_use]
    pub fn ratings(&self) -> &RatingResolver {
        &self.ratings
    }

    /// Runs the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns an [`AggregationError`] when every source failed or the
    /// final set is empty. When sources answered without quotes the
    /// synthetic set is returned and the outcome is degraded.
    #[instrument(skip(self), fields(pair = %request.pair(), amount = %request.amount()))]
    pub async fn aggregate(
        &self,
        request: &TransferRequest,
    ) -> Result<AggregationOutcome, AggregationError> {
        let started_at = Timestamp::now();
        let run_id = RunId::new_v4();

        let (collected, external) = tokio::join!(
            self.collector.collect(request),
            self.baseline.fetch_external(request)
        );
        let collection = collected?;

        let baseline = self.baseline.resolve(request, &collection.quotes, external);

        let synthetic_only = collection.quotes.is_empty();
        if synthetic_only {
            warn!(
                sources_responded = collection.sources_responded,
                "sources returned no quotes, serving synthetic pricing only"
            );
        }
        let mut quotes = collection.quotes;
        let synthetic = self.synthetic.generate(request, &baseline);
        let synthetic_added = synthetic.len();
        quotes.extend(synthetic);

        let deduped = deduplicate(quotes);
        if deduped.collapsed > 0 {
            debug!(collapsed = deduped.collapsed, "duplicate quotes collapsed");
        }
        let mut quotes = deduped.quotes;

        self.margins.normalize(&mut quotes, &baseline);
        self.ratings.resolve_all(&mut quotes).await;

        let best_deal = RankingEngine::best_deal(&quotes)
            .cloned()
            .ok_or(AggregationError::NoQuotes {
                sources_responded: collection.sources_responded,
            })?;

        let stats = AggregationStats {
            run_id,
            sources_queried: collection.sources_queried,
            sources_responded: collection.sources_responded,
            failed_sources: collection
                .failures
                .iter()
                .map(|failure| failure.source_id.clone())
                .collect(),
            prefiltered: collection.prefiltered,
            synthetic_added,
            synthetic_only,
            duplicates_collapsed: deduped.collapsed,
            quote_count: quotes.len(),
            started_at,
            duration_ms: started_at.elapsed_ms(),
        };

        info!(
            run_id = %stats.run_id,
            sources_queried = stats.sources_queried,
            sources_responded = stats.sources_responded,
            failed = stats.failed_sources.len(),
            quotes = stats.quote_count,
            baseline = %baseline.rate(),
            baseline_source = %baseline.source(),
            best = %best_deal.provider_key(),
            duration_ms = stats.duration_ms,
            "aggregation complete"
        );

        Ok(AggregationOutcome {
            quotes,
            best_deal,
            baseline,
            stats,
        })
    }

    /// Sorts quotes by one criterion.
    ///
    /// Confirmed ratings are read from the store at call time, so the
    /// result is eventually consistent with confirmations received so far.
    pub async fn sort(
        &self,
        quotes: Vec<Quote>,
        criterion: SortCriterion,
        direction: SortDirection,
    ) -> Vec<Quote> {
        let confirmed = if criterion == SortCriterion::Rating {
            self.confirmed_or_empty().await
        } else {
            HashMap::new()
        };
        self.ranking.sort(quotes, criterion, direction, &confirmed)
    }

    /// Records a rating confirmed by the rendering layer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for values outside `[0, 5]`, or a
    /// repository error if the store rejects the write.
    #[instrument(skip(self))]
    pub async fn on_rating_confirmed(
        &self,
        key: &ProviderKey,
        value: Decimal,
    ) -> ApplicationResult<Rating> {
        self.ratings.confirm(key, value).await
    }

    /// Re-runs the rating cascade over an existing result set.
    pub async fn refresh_ratings(&self, quotes: &mut [Quote]) {
        self.ratings.resolve_all(quotes).await;
    }

    async fn confirmed_or_empty(&self) -> HashMap<ProviderKey, Rating> {
        match self.ratings.confirmed_ratings().await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                warn!(error = %e, "confirmed ratings unavailable, sorting on resolved ratings");
                HashMap::new()
            }
        }
    }
}
