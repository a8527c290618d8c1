//! # Rating Resolver
//!
//! Assigns every quote a rating through an ordered cascade of lookups and
//! accepts confirmations from the rendering layer.
//!
//! The cascade is [`RatingLookup::CASCADE`]; each lookup is a pure
//! `Option<Rating>` strategy and the first `Some` wins. The last lookup
//! always answers, so no quote leaves [`RatingResolver::resolve_all`]
//! unrated.
//!
//! Confirmations are eventually consistent: a confirmation received after a
//! run only affects the next resolution pass (or an explicit refresh).

use crate::application::error::ApplicationResult;
use crate::domain::entities::{Quote, RatingRecord};
use crate::domain::value_objects::{ProviderKey, Rating, RatingProvenance};
use crate::infrastructure::persistence::RatingStore;
use crate::infrastructure::reference_data::StaticRatingMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One step of the rating cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingLookup {
    /// Value confirmed by the rendering layer.
    ConfirmedByView,
    /// Static reference map, tried under several spellings.
    StaticMap,
    /// Pinned per-provider overrides.
    HardcodedOverride,
    /// Per-provider default table, then the source's own rating.
    ProviderDefault,
    /// Neutral default.
    GenericFallback,
}

impl RatingLookup {
    /// Evaluation order.
    pub const CASCADE: [Self; 5] = [
        Self::ConfirmedByView,
        Self::StaticMap,
        Self::HardcodedOverride,
        Self::ProviderDefault,
        Self::GenericFallback,
    ];

    /// Returns the provenance tag recorded for a hit.
    #[must_use]
    pub const fn provenance(self) -> RatingProvenance {
        match self {
            Self::ConfirmedByView => RatingProvenance::ConfirmedByView,
            Self::StaticMap => RatingProvenance::StaticMap,
            Self::HardcodedOverride => RatingProvenance::HardcodedOverride,
            Self::ProviderDefault => RatingProvenance::ProviderDefault,
            Self::GenericFallback => RatingProvenance::GenericFallback,
        }
    }
}

/// Tables behind the non-store lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingPolicy {
    /// Ratings pinned regardless of what other tables say below the static map.
    pub hardcoded_overrides: HashMap<ProviderKey, Rating>,
    /// Per-provider fallbacks.
    pub provider_defaults: HashMap<ProviderKey, Rating>,
    /// Value used when nothing else matches.
    pub neutral_default: Rating,
}

impl RatingPolicy {
    /// The neutral fallback rating.
    pub const NEUTRAL_DEFAULT: Decimal = dec!(4.0);
}

fn table(entries: &[(&str, Decimal)]) -> HashMap<ProviderKey, Rating> {
    entries
        .iter()
        .filter_map(|(key, value)| ProviderKey::normalize(key).map(|k| (k, Rating::clamped(*value))))
        .collect()
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            hardcoded_overrides: table(&[
                ("wise", dec!(4.3)),
                ("revolut", dec!(4.2)),
                ("paypal", dec!(3.0)),
            ]),
            provider_defaults: table(&[
                ("xoom", dec!(3.8)),
                ("azimo", dec!(4.0)),
                ("transfergo", dec!(4.3)),
                ("sendwave", dec!(4.4)),
                ("atlantic", dec!(4.5)),
            ]),
            neutral_default: Rating::clamped(Self::NEUTRAL_DEFAULT),
        }
    }
}

/// Spellings of a provider code tried against the static map.
///
/// Lowercased; with `-`, `_`, spaces and dots removed; and with `_` and
/// `-` swapped for each other. Duplicates are dropped, order is kept.
#[must_use]
pub fn code_variants(code: &str) -> Vec<String> {
    let lower = code.trim().to_lowercase();
    let stripped: String = lower
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '.'))
        .collect();
    let underscored = lower.replace('-', "_");
    let dashed = lower.replace('_', "-");

    let mut variants: Vec<String> = Vec::with_capacity(4);
    for candidate in [lower, stripped, underscored, dashed] {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// Keys tried against the static map for a quote, most specific first.
#[must_use]
pub fn static_map_candidates(quote: &Quote) -> Vec<String> {
    let identity = quote.identity();
    let mut candidates = vec![quote.provider_key().as_str().to_string()];
    if let Some(identifier) = &identity.identifier {
        candidates.push(identifier.clone());
    }
    if let Some(code) = &identity.code {
        candidates.push(code.clone());
        candidates.extend(code_variants(code));
    }
    candidates
}

/// Cascade evaluator plus the confirmation entry point.
#[derive(Debug, Clone)]
pub struct RatingResolver {
    store: Arc<dyn RatingStore>,
    static_map: Arc<StaticRatingMap>,
    policy: RatingPolicy,
}

impl RatingResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        store: Arc<dyn RatingStore>,
        static_map: Arc<StaticRatingMap>,
        policy: RatingPolicy,
    ) -> Self {
        Self {
            store,
            static_map,
            policy,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RatingStore> {
        &self.store
    }

    /// Returns the confirmed rating for a provider, if any. Store failures
    /// read as "not confirmed".
    pub async fn confirmed_rating(&self, key: &ProviderKey) -> Option<Rating> {
        match self.store.get_confirmed(key).await {
            Ok(rating) => rating,
            Err(e) => {
                warn!(provider = %key, error = %e, "rating store read failed");
                None
            }
        }
    }

    /// Returns every confirmed rating.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the store cannot be read.
    pub async fn confirmed_ratings(&self) -> ApplicationResult<HashMap<ProviderKey, Rating>> {
        Ok(self
            .store
            .snapshot()
            .await?
            .into_iter()
            .filter(|(_, record)| record.is_confirmed())
            .map(|(key, record)| (key, record.value()))
            .collect())
    }

    /// Evaluates a single lookup for a quote.
    pub async fn evaluate(&self, lookup: RatingLookup, quote: &Quote) -> Option<Rating> {
        let key = quote.provider_key();
        match lookup {
            RatingLookup::ConfirmedByView => self.confirmed_rating(key).await,
            RatingLookup::StaticMap => static_map_candidates(quote)
                .iter()
                .find_map(|candidate| self.static_map.get(candidate)),
            RatingLookup::HardcodedOverride => self.policy.hardcoded_overrides.get(key).copied(),
            RatingLookup::ProviderDefault => self
                .policy
                .provider_defaults
                .get(key)
                .copied()
                .or_else(|| quote.source_rating()),
            RatingLookup::GenericFallback => Some(self.policy.neutral_default),
        }
    }

    /// Runs the cascade for one quote.
    pub async fn resolve(&self, quote: &Quote) -> (Rating, RatingProvenance) {
        for lookup in RatingLookup::CASCADE {
            if let Some(rating) = self.evaluate(lookup, quote).await {
                return (rating, lookup.provenance());
            }
        }
        (self.policy.neutral_default, RatingProvenance::GenericFallback)
    }

    /// Rates every quote and lazily remembers non-confirmed results.
    pub async fn resolve_all(&self, quotes: &mut [Quote]) {
        for quote in quotes.iter_mut() {
            let (rating, provenance) = self.resolve(quote).await;
            debug!(provider = %quote.provider_key(), %rating, %provenance, "rating resolved");
            quote.assign_rating(rating, provenance);

            if !provenance.is_confirmed() {
                let record = RatingRecord::new(rating, provenance);
                if let Err(e) = self.store.remember(quote.provider_key(), record).await {
                    warn!(provider = %quote.provider_key(), error = %e, "failed to cache rating");
                }
            }
        }
    }

    /// Records a rating confirmed by the rendering layer. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the value is outside `[0, 5]`,
    /// or `ApplicationError::Repository` if the store rejects the write.
    pub async fn confirm(&self, key: &ProviderKey, value: Decimal) -> ApplicationResult<Rating> {
        let rating = Rating::new(value)?;
        self.store.confirm(key, rating).await?;
        debug!(provider = %key, %rating, "rating confirmed by view");
        Ok(rating)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::QuoteBuilder;
    use crate::domain::value_objects::{ProviderIdentity, SourceChannel};
    use crate::infrastructure::persistence::InMemoryRatingStore;

    fn quote(identity: ProviderIdentity) -> Quote {
        QuoteBuilder::new(identity, SourceChannel::GenericAggregator, dec!(1.1), dec!(100))
            .build()
            .unwrap()
    }

    fn resolver_with(map: StaticRatingMap) -> (RatingResolver, Arc<InMemoryRatingStore>) {
        let store = Arc::new(InMemoryRatingStore::new());
        let resolver = RatingResolver::new(store.clone(), Arc::new(map), RatingPolicy::default());
        (resolver, store)
    }

    fn rating(value: Decimal) -> Rating {
        Rating::new(value).unwrap()
    }

    mod variants {
        use super::*;

        #[test]
        fn code_variants_cover_punctuation() {
            assert_eq!(
                code_variants("Western_Union"),
                vec!["western_union", "westernunion", "western-union"]
            );
            assert_eq!(code_variants("wise"), vec!["wise"]);
            assert!(code_variants("  ").is_empty());
        }

        #[test]
        fn candidates_start_with_provider_key() {
            let q = quote(
                ProviderIdentity::named("World Remit")
                    .with_identifier("provider_worldremit")
                    .with_code("World.Remit"),
            );
            let candidates = static_map_candidates(&q);
            assert_eq!(candidates[0], "worldremit");
            assert_eq!(candidates[1], "provider_worldremit");
            assert!(candidates.contains(&"world.remit".to_string()));
        }
    }

    mod cascade {
        use super::*;

        #[tokio::test]
        async fn confirmed_beats_everything() {
            let (resolver, store) = resolver_with(StaticRatingMap::with_defaults());
            store.confirm(&ProviderKey::new("wise").unwrap(), rating(dec!(4.9))).await.unwrap();

            let (value, provenance) = resolver.resolve(&quote(ProviderIdentity::named("Wise"))).await;
            assert_eq!(value, rating(dec!(4.9)));
            assert_eq!(provenance, RatingProvenance::ConfirmedByView);
        }

        #[tokio::test]
        async fn static_map_beats_hardcoded_override() {
            let map = StaticRatingMap::new([("wise".to_string(), rating(dec!(4.6)))]);
            let (resolver, _) = resolver_with(map);

            let (value, provenance) = resolver.resolve(&quote(ProviderIdentity::named("Wise"))).await;
            assert_eq!(value, rating(dec!(4.6)));
            assert_eq!(provenance, RatingProvenance::StaticMap);
        }

        #[tokio::test]
        async fn static_map_matches_code_variant() {
            let map = StaticRatingMap::new([("western-union".to_string(), rating(dec!(3.9)))]);
            let (resolver, _) = resolver_with(map);
            let q = quote(ProviderIdentity::named("WU").with_code("Western_Union"));

            let (value, provenance) = resolver.resolve(&q).await;
            assert_eq!(value, rating(dec!(3.9)));
            assert_eq!(provenance, RatingProvenance::StaticMap);
        }

        #[tokio::test]
        async fn hardcoded_override_when_not_in_map() {
            let (resolver, _) = resolver_with(StaticRatingMap::default());
            let (value, provenance) = resolver.resolve(&quote(ProviderIdentity::named("Wise"))).await;
            assert_eq!(value, rating(dec!(4.3)));
            assert_eq!(provenance, RatingProvenance::HardcodedOverride);
        }

        #[tokio::test]
        async fn provider_default_then_source_rating() {
            let (resolver, _) = resolver_with(StaticRatingMap::default());

            let (value, provenance) = resolver.resolve(&quote(ProviderIdentity::named("Xoom"))).await;
            assert_eq!(value, rating(dec!(3.8)));
            assert_eq!(provenance, RatingProvenance::ProviderDefault);

            let rated = QuoteBuilder::new(
                ProviderIdentity::named("Tiny FX"),
                SourceChannel::GenericAggregator,
                dec!(1.1),
                dec!(100),
            )
            .rating(rating(dec!(3.3)))
            .build()
            .unwrap();
            let (value, provenance) = resolver.resolve(&rated).await;
            assert_eq!(value, rating(dec!(3.3)));
            assert_eq!(provenance, RatingProvenance::ProviderDefault);
        }

        #[tokio::test]
        async fn generic_fallback_guarantees_a_value() {
            let (resolver, _) = resolver_with(StaticRatingMap::default());
            let (value, provenance) = resolver.resolve(&quote(ProviderIdentity::named("Nobody"))).await;
            assert_eq!(value, rating(dec!(4.0)));
            assert_eq!(provenance, RatingProvenance::GenericFallback);
        }
    }

    mod feedback {
        use super::*;

        #[tokio::test]
        async fn resolve_all_rates_and_remembers() {
            let (resolver, store) = resolver_with(StaticRatingMap::default());
            let mut quotes = vec![
                quote(ProviderIdentity::named("Nobody")),
                quote(ProviderIdentity::named("Xoom")),
            ];
            resolver.resolve_all(&mut quotes).await;

            assert!(quotes.iter().all(|q| q.rating().is_some()));
            assert_eq!(store.len(), 2);
            let record = store.get(&ProviderKey::new("xoom").unwrap()).await.unwrap().unwrap();
            assert_eq!(record.provenance(), RatingProvenance::ProviderDefault);
        }

        #[tokio::test]
        async fn confirmation_applies_on_next_pass() {
            let (resolver, _) = resolver_with(StaticRatingMap::default());
            let mut quotes = vec![quote(ProviderIdentity::named("Nobody"))];
            resolver.resolve_all(&mut quotes).await;
            assert_eq!(quotes[0].rating_provenance(), Some(RatingProvenance::GenericFallback));

            resolver
                .confirm(&ProviderKey::new("nobody").unwrap(), dec!(2.5))
                .await
                .unwrap();
            resolver.resolve_all(&mut quotes).await;
            assert_eq!(quotes[0].rating(), Some(rating(dec!(2.5))));
            assert_eq!(quotes[0].rating_provenance(), Some(RatingProvenance::ConfirmedByView));
        }

        #[tokio::test]
        async fn provisional_values_never_replace_confirmed() {
            let (resolver, store) = resolver_with(StaticRatingMap::default());
            let key = ProviderKey::new("nobody").unwrap();
            resolver.confirm(&key, dec!(1.5)).await.unwrap();

            let mut quotes = vec![quote(ProviderIdentity::named("Nobody"))];
            resolver.resolve_all(&mut quotes).await;
            assert_eq!(store.get_confirmed(&key).await.unwrap(), Some(rating(dec!(1.5))));
        }

        #[tokio::test]
        async fn out_of_range_confirmation_is_rejected() {
            let (resolver, store) = resolver_with(StaticRatingMap::default());
            let err = resolver
                .confirm(&ProviderKey::new("wise").unwrap(), dec!(5.5))
                .await
                .unwrap_err();
            assert!(err.is_validation());
            assert!(store.is_empty());
        }

        #[tokio::test]
        async fn confirmed_ratings_excludes_provisional() {
            let (resolver, _) = resolver_with(StaticRatingMap::default());
            let mut quotes = vec![quote(ProviderIdentity::named("Nobody"))];
            resolver.resolve_all(&mut quotes).await;
            resolver.confirm(&ProviderKey::new("wise").unwrap(), dec!(4.8)).await.unwrap();

            let confirmed = resolver.confirmed_ratings().await.unwrap();
            assert_eq!(confirmed.len(), 1);
            assert!(confirmed.contains_key(&ProviderKey::new("wise").unwrap()));
        }
    }

    mod outage {
        use super::*;
        use crate::application::error::ApplicationError;
        use crate::infrastructure::persistence::{RepositoryError, RepositoryResult};
        use async_trait::async_trait;
        use tokio_test::assert_err;

        #[derive(Debug)]
        struct UnavailableStore;

        #[async_trait]
        impl RatingStore for UnavailableStore {
            async fn get(&self, _key: &ProviderKey) -> RepositoryResult<Option<RatingRecord>> {
                Err(RepositoryError::unavailable("down"))
            }

            async fn confirm(&self, _key: &ProviderKey, _rating: Rating) -> RepositoryResult<()> {
                Err(RepositoryError::unavailable("down"))
            }

            async fn remember(
                &self,
                _key: &ProviderKey,
                _record: RatingRecord,
            ) -> RepositoryResult<bool> {
                Err(RepositoryError::unavailable("down"))
            }

            async fn snapshot(&self) -> RepositoryResult<Vec<(ProviderKey, RatingRecord)>> {
                Err(RepositoryError::unavailable("down"))
            }

            async fn count(&self) -> RepositoryResult<u64> {
                Err(RepositoryError::unavailable("down"))
            }
        }

        fn unavailable() -> RatingResolver {
            RatingResolver::new(
                Arc::new(UnavailableStore),
                Arc::new(StaticRatingMap::default()),
                RatingPolicy::default(),
            )
        }

        #[tokio::test]
        async fn cascade_survives_store_outage() {
            let mut quotes = vec![quote(ProviderIdentity::named("Xoom"))];
            unavailable().resolve_all(&mut quotes).await;
            assert_eq!(quotes[0].rating(), Some(rating(dec!(3.8))));
            assert_eq!(quotes[0].rating_provenance(), Some(RatingProvenance::ProviderDefault));
        }

        #[tokio::test]
        async fn confirmation_reports_retryable_store_error() {
            let err = unavailable()
                .confirm(&ProviderKey::new("wise").unwrap(), dec!(4.0))
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::Repository(_)));
            assert!(err.is_retryable());
            assert_err!(unavailable().confirmed_ratings().await);
        }
    }
}
