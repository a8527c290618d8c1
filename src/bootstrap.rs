//! # Bootstrap
//!
//! Builds a ready-to-serve [`QuoteAggregationEngine`] from [`AppConfig`].

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{
    BaselineResolver, ProviderResultCollector, QuoteAggregationEngine, RatingPolicy,
    RatingResolver,
};
use crate::config::{AppConfig, RatingsConfig, SyntheticConfig};
use crate::domain::services::{SyntheticQuoteGenerator, default_roster};
use crate::domain::value_objects::{ProviderIdentity, ProviderKey, Rating};
use crate::infrastructure::persistence::{InMemoryRatingStore, RatingStore};
use crate::infrastructure::rates::{HttpMidMarketRateService, MidMarketRateService, StaticRateTable};
use crate::infrastructure::reference_data::StaticRatingMap;
use crate::infrastructure::sources::{
    DedicatedProviderSource, GenericAggregatorSource, HttpClient, QuoteSource,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builds the engine with an in-memory rating store.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if the HTTP client cannot be
/// built, the static rating map cannot be loaded, or a configured rating
/// is invalid.
pub fn build_engine(config: &AppConfig) -> ApplicationResult<QuoteAggregationEngine> {
    build_engine_with_store(config, Arc::new(InMemoryRatingStore::new()))
}

/// Builds the engine around an existing rating store.
///
/// # Errors
///
/// See [`build_engine`].
pub fn build_engine_with_store(
    config: &AppConfig,
    store: Arc<dyn RatingStore>,
) -> ApplicationResult<QuoteAggregationEngine> {
    let client = HttpClient::new(config.sources.per_source_timeout_ms)
        .map_err(|e| ApplicationError::configuration(format!("http client: {e}")))?;

    let sources = quote_sources(config, &client);
    let collector = ProviderResultCollector::new(
        sources,
        Duration::from_millis(config.sources.per_source_timeout_ms),
    );

    let rate_service = config.sources.rate_service.as_ref().map(|endpoint| {
        Arc::new(HttpMidMarketRateService::new(endpoint.clone(), client.clone()))
            as Arc<dyn MidMarketRateService>
    });
    let baseline = BaselineResolver::new(
        rate_service,
        StaticRateTable::with_defaults(),
        config
            .baseline
            .reference_provider
            .as_deref()
            .and_then(ProviderKey::normalize),
        Duration::from_millis(config.baseline.rate_service_timeout_ms),
    );

    let static_map = match &config.ratings.static_map_path {
        Some(path) => StaticRatingMap::load(path)
            .map_err(|e| ApplicationError::configuration(e.to_string()))?,
        None => StaticRatingMap::with_defaults(),
    };
    let ratings = RatingResolver::new(store, Arc::new(static_map), rating_policy(&config.ratings)?);

    let synthetic = synthetic_generator(&config.synthetic);

    info!(
        sources = collector.sources().len(),
        synthetic = synthetic.len(),
        reference = ?baseline.reference_provider().map(ProviderKey::as_str),
        rate_service = config.sources.rate_service.is_some(),
        "engine assembled"
    );

    Ok(QuoteAggregationEngine::new(collector, baseline, synthetic, ratings))
}

fn quote_sources(config: &AppConfig, client: &HttpClient) -> Vec<Arc<dyn QuoteSource>> {
    let aggregators = config.sources.aggregators.iter().map(|aggregator| {
        Arc::new(GenericAggregatorSource::new(
            aggregator.id.clone(),
            aggregator.endpoint.clone(),
            client.clone(),
        )) as Arc<dyn QuoteSource>
    });
    let dedicated = config.sources.dedicated.iter().map(|dedicated| {
        let identity = ProviderIdentity::named(dedicated.name.clone()).with_code(dedicated.code.clone());
        let mut source =
            DedicatedProviderSource::new(identity, dedicated.endpoint.clone(), client.clone());
        if let Some(logo) = &dedicated.logo_ref {
            source = source.with_logo_ref(logo.clone());
        }
        Arc::new(source) as Arc<dyn QuoteSource>
    });
    aggregators.chain(dedicated).collect()
}

/// Merges configured rating tables over the built-in policy.
///
/// # Errors
///
/// Returns a domain validation error for a rating outside `[0, 5]` or a
/// key with no alphanumeric characters.
pub fn rating_policy(config: &RatingsConfig) -> ApplicationResult<RatingPolicy> {
    let mut policy = RatingPolicy::default();
    merge_table(&mut policy.hardcoded_overrides, &config.overrides)?;
    merge_table(&mut policy.provider_defaults, &config.provider_defaults)?;
    policy.neutral_default = Rating::new(config.neutral_default)?;
    Ok(policy)
}

fn merge_table(
    table: &mut HashMap<ProviderKey, Rating>,
    entries: &BTreeMap<String, Decimal>,
) -> ApplicationResult<()> {
    for (key, value) in entries {
        table.insert(ProviderKey::new(key)?, Rating::new(*value)?);
    }
    Ok(())
}

fn synthetic_generator(config: &SyntheticConfig) -> SyntheticQuoteGenerator {
    if !config.enabled {
        return SyntheticQuoteGenerator::new(Vec::new());
    }
    match &config.roster {
        Some(roster) => SyntheticQuoteGenerator::new(roster.clone()),
        None => SyntheticQuoteGenerator::new(default_roster()),
    }
}
