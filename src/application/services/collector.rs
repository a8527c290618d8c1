//! # Provider Result Collector
//!
//! Polls every configured [`QuoteSource`] concurrently and merges whatever
//! comes back.
//!
//! Each source is bounded by its own timeout and awaited independently, so
//! one slow or failing source never stalls or poisons the others. A failed
//! source contributes zero quotes and is recorded in
//! [`Collection::failures`].

use crate::application::error::AggregationError;
use crate::domain::entities::{Quote, TransferRequest};
use crate::domain::value_objects::{ProviderKey, SourceChannel};
use crate::infrastructure::sources::{QuoteSource, SourceError};
use futures::future::join_all;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// A source that produced no quotes, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Identifier of the failed source.
    pub source_id: String,
    /// What went wrong.
    pub error: SourceError,
}

impl SourceFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(source_id: impl Into<String>, error: SourceError) -> Self {
        Self {
            source_id: source_id.into(),
            error,
        }
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_id, self.error)
    }
}

/// Everything the sources returned for one request.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Quotes in source-configuration order, then payload order.
    pub quotes: Vec<Quote>,
    /// Number of sources polled.
    pub sources_queried: usize,
    /// Number of sources that answered successfully.
    pub sources_responded: usize,
    /// Sources that failed.
    pub failures: Vec<SourceFailure>,
    /// Aggregator quotes dropped because a dedicated source covers the provider.
    pub prefiltered: usize,
}

/// Concurrent fan-out over quote sources.
#[derive(Debug, Clone)]
pub struct ProviderResultCollector {
    sources: Vec<Arc<dyn QuoteSource>>,
    per_source_timeout: Duration,
}

impl ProviderResultCollector {
    /// Creates a collector.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn QuoteSource>>, per_source_timeout: Duration) -> Self {
        Self {
            sources,
            per_source_timeout,
        }
    }

    /// Returns the configured sources.
    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn QuoteSource>] {
        &self.sources
    }

    /// Returns the per-source timeout.
    #[must_use]
    pub fn per_source_timeout(&self) -> Duration {
        self.per_source_timeout
    }

    /// Returns the providers covered by a dedicated source.
    #[must_use]
    pub fn dedicated_providers(&self) -> HashSet<ProviderKey> {
        self.sources
            .iter()
            .filter_map(|source| source.dedicated_provider().cloned())
            .collect()
    }

    /// Polls all sources and merges their quotes.
    ///
    /// # Errors
    ///
    /// - `AggregationError::NoSourcesAvailable` - No sources are configured
    /// - `AggregationError::AllSourcesFailed` - Every source failed
    ///
    /// Sources that answer with nothing still count as responding, so an
    /// empty collection is `Ok`.
    pub async fn collect(&self, request: &TransferRequest) -> Result<Collection, AggregationError> {
        if self.sources.is_empty() {
            return Err(AggregationError::NoSourcesAvailable);
        }

        let per_source_timeout = self.per_source_timeout;
        let pending = self.sources.iter().map(|source| async move {
            let outcome = match timeout(per_source_timeout, source.fetch_quotes(request)).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::timeout_with_duration(
                    format!("{} did not answer", source.source_id()),
                    u64::try_from(per_source_timeout.as_millis()).unwrap_or(u64::MAX),
                )),
            };
            (source, outcome)
        });
        let settled = join_all(pending).await;

        let dedicated = self.dedicated_providers();
        let mut collection = Collection {
            sources_queried: self.sources.len(),
            ..Collection::default()
        };

        for (source, outcome) in settled {
            match outcome {
                Ok(quotes) => {
                    collection.sources_responded += 1;
                    debug!(source = %source.source_id(), quotes = quotes.len(), "source responded");
                    for quote in quotes {
                        if quote.source_channel() == SourceChannel::GenericAggregator
                            && dedicated.contains(quote.provider_key())
                        {
                            collection.prefiltered += 1;
                            continue;
                        }
                        collection.quotes.push(quote);
                    }
                }
                Err(error) => {
                    warn!(
                        source = %source.source_id(),
                        kind = error.kind(),
                        error = %error,
                        "quote source failed"
                    );
                    collection
                        .failures
                        .push(SourceFailure::new(source.source_id(), error));
                }
            }
        }

        if collection.sources_responded == 0 {
            return Err(AggregationError::AllSourcesFailed(collection.failures));
        }
        Ok(collection)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entities::QuoteBuilder;
    use crate::domain::value_objects::ProviderIdentity;
    use crate::infrastructure::sources::SourceResult;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Scripted source for engine tests.
    #[derive(Debug)]
    pub(crate) struct StubSource {
        id: String,
        channel: SourceChannel,
        dedicated: Option<ProviderKey>,
        result: Result<Vec<(String, Decimal, Decimal)>, SourceError>,
        delay: Duration,
    }

    impl StubSource {
        pub(crate) fn aggregator(id: &str, entries: &[(&str, Decimal, Decimal)]) -> Self {
            Self {
                id: id.to_string(),
                channel: SourceChannel::GenericAggregator,
                dedicated: None,
                result: Ok(entries
                    .iter()
                    .map(|(name, rate, fee)| ((*name).to_string(), *rate, *fee))
                    .collect()),
                delay: Duration::ZERO,
            }
        }

        pub(crate) fn dedicated(name: &str, rate: Decimal, fee: Decimal) -> Self {
            Self {
                id: format!("dedicated:{name}"),
                channel: SourceChannel::DedicatedLive,
                dedicated: ProviderKey::normalize(name),
                result: Ok(vec![(name.to_string(), rate, fee)]),
                delay: Duration::ZERO,
            }
        }

        pub(crate) fn failing(id: &str, error: SourceError) -> Self {
            Self {
                id: id.to_string(),
                channel: SourceChannel::GenericAggregator,
                dedicated: None,
                result: Err(error),
                delay: Duration::ZERO,
            }
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl QuoteSource for StubSource {
        fn source_id(&self) -> &str {
            &self.id
        }

        fn channel(&self) -> SourceChannel {
            self.channel
        }

        fn dedicated_provider(&self) -> Option<&ProviderKey> {
            self.dedicated.as_ref()
        }

        async fn fetch_quotes(&self, request: &TransferRequest) -> SourceResult<Vec<Quote>> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let entries = self.result.clone()?;
            Ok(entries
                .into_iter()
                .enumerate()
                .map(|(position, (name, rate, fee))| {
                    QuoteBuilder::new(
                        ProviderIdentity::named(name),
                        self.channel,
                        rate,
                        request.amount(),
                    )
                    .position(position)
                    .source_id(self.id.clone())
                    .transfer_fee(fee)
                    .build()
                    .unwrap()
                })
                .collect())
        }
    }

    fn request() -> TransferRequest {
        TransferRequest::parse("GBP", "EUR", dec!(1000)).unwrap()
    }

    fn collector(sources: Vec<Arc<dyn QuoteSource>>) -> ProviderResultCollector {
        ProviderResultCollector::new(sources, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn merges_in_source_order() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(StubSource::aggregator(
                "agg",
                &[("Remitly", dec!(1.15), dec!(0)), ("Western Union", dec!(1.14), dec!(2))],
            )),
            Arc::new(StubSource::dedicated("Wise", dec!(1.165), dec!(3))),
        ];
        let collection = collector(sources).collect(&request()).await.unwrap();

        let keys: Vec<_> = collection.quotes.iter().map(|q| q.provider_key().as_str()).collect();
        assert_eq!(keys, vec!["remitly", "westernunion", "wise"]);
        assert_eq!(collection.sources_queried, 2);
        assert_eq!(collection.sources_responded, 2);
        assert!(collection.failures.is_empty());
    }

    #[tokio::test]
    async fn prefilters_aggregator_quotes_for_dedicated_providers() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(StubSource::aggregator(
                "agg",
                &[("Wise", dec!(1.198), dec!(0)), ("Remitly", dec!(1.15), dec!(0))],
            )),
            Arc::new(StubSource::dedicated("Wise", dec!(1.20), dec!(0))),
        ];
        let collection = collector(sources).collect(&request()).await.unwrap();

        assert_eq!(collection.prefiltered, 1);
        let wise: Vec<_> = collection
            .quotes
            .iter()
            .filter(|q| q.provider_key().as_str() == "wise")
            .collect();
        assert_eq!(wise.len(), 1);
        assert_eq!(wise[0].rate(), dec!(1.20));
    }

    #[tokio::test]
    async fn tolerates_partial_failure() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(StubSource::failing("broken", SourceError::connection("refused"))),
            Arc::new(StubSource::dedicated("Wise", dec!(1.16), dec!(0))),
        ];
        let collection = collector(sources).collect(&request()).await.unwrap();

        assert_eq!(collection.quotes.len(), 1);
        assert_eq!(collection.failures.len(), 1);
        assert_eq!(collection.failures[0].source_id, "broken");
    }

    #[tokio::test]
    async fn slow_source_times_out_without_stalling_others() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(
                StubSource::aggregator("slow", &[("Remitly", dec!(1.1), dec!(0))])
                    .with_delay(Duration::from_secs(5)),
            ),
            Arc::new(StubSource::dedicated("Wise", dec!(1.16), dec!(0))),
        ];
        let collection = collector(sources).collect(&request()).await.unwrap();

        assert_eq!(collection.quotes.len(), 1);
        assert!(matches!(collection.failures[0].error, SourceError::Timeout { .. }));
    }

    #[tokio::test]
    async fn no_sources() {
        let err = collector(Vec::new()).collect(&request()).await.unwrap_err();
        assert!(matches!(err, AggregationError::NoSourcesAvailable));
    }

    #[tokio::test]
    async fn all_sources_fail() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(StubSource::failing("a", SourceError::status(500, "boom"))),
            Arc::new(StubSource::failing("b", SourceError::malformed_payload("junk"))),
        ];
        let err = collector(sources).collect(&request()).await.unwrap_err();
        match err {
            AggregationError::AllSourcesFailed(failures) => assert_eq!(failures.len(), 2),
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_answers_still_count_as_responded() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![
            Arc::new(StubSource::aggregator("agg", &[])),
            Arc::new(StubSource::failing("down", SourceError::status(503, "busy"))),
        ];
        let collection = collector(sources).collect(&request()).await.unwrap();
        assert!(collection.quotes.is_empty());
        assert_eq!(collection.sources_responded, 1);
        assert_eq!(collection.failures.len(), 1);
    }
}
