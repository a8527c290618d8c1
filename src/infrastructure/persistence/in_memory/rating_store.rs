//! # In-Memory Rating Store
//!
//! [`RatingStore`] backed by a `DashMap`, so confirmations for different
//! providers never contend on one lock.

use crate::domain::entities::RatingRecord;
use crate::domain::value_objects::{ProviderKey, Rating};
use crate::infrastructure::persistence::traits::{RatingStore, RepositoryResult};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// In-memory implementation of [`RatingStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRatingStore {
    storage: Arc<DashMap<ProviderKey, RatingRecord>>,
}

impl InMemoryRatingStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.storage.clear();
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn get(&self, key: &ProviderKey) -> RepositoryResult<Option<RatingRecord>> {
        Ok(self.storage.get(key).map(|entry| *entry.value()))
    }

    async fn confirm(&self, key: &ProviderKey, rating: Rating) -> RepositoryResult<()> {
        self.storage
            .insert(key.clone(), RatingRecord::confirmed(rating));
        Ok(())
    }

    async fn remember(&self, key: &ProviderKey, record: RatingRecord) -> RepositoryResult<bool> {
        match self.storage.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_confirmed() {
                    Ok(false)
                } else {
                    occupied.insert(record);
                    Ok(true)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                Ok(true)
            }
        }
    }

    async fn snapshot(&self) -> RepositoryResult<Vec<(ProviderKey, RatingRecord)>> {
        Ok(self
            .storage
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.storage.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::RatingProvenance;
    use rust_decimal_macros::dec;
    use tokio_test::assert_ok;

    fn key(raw: &str) -> ProviderKey {
        ProviderKey::new(raw).unwrap()
    }

    fn rating(value: rust_decimal::Decimal) -> Rating {
        Rating::new(value).unwrap()
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemoryRatingStore::new();
        assert!(store.is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.get(&key("wise")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn confirm_is_last_write_wins() {
        let store = InMemoryRatingStore::new();
        assert_ok!(store.confirm(&key("wise"), rating(dec!(4.1))).await);
        assert_ok!(store.confirm(&key("wise"), rating(dec!(4.7))).await);

        let confirmed = store.get_confirmed(&key("wise")).await.unwrap();
        assert_eq!(confirmed, Some(rating(dec!(4.7))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn remember_never_replaces_confirmed() {
        let store = InMemoryRatingStore::new();
        store.confirm(&key("wise"), rating(dec!(4.7))).await.unwrap();

        let stored = store
            .remember(
                &key("wise"),
                RatingRecord::new(rating(dec!(4.0)), RatingProvenance::GenericFallback),
            )
            .await
            .unwrap();
        assert!(!stored);
        assert_eq!(store.get_confirmed(&key("wise")).await.unwrap(), Some(rating(dec!(4.7))));
    }

    #[tokio::test]
    async fn remember_replaces_provisional() {
        let store = InMemoryRatingStore::new();
        let first = RatingRecord::new(rating(dec!(4.0)), RatingProvenance::GenericFallback);
        let second = RatingRecord::new(rating(dec!(4.5)), RatingProvenance::StaticMap);
        assert!(store.remember(&key("ofx"), first).await.unwrap());
        assert!(store.remember(&key("ofx"), second).await.unwrap());

        let record = store.get(&key("ofx")).await.unwrap().unwrap();
        assert_eq!(record.provenance(), RatingProvenance::StaticMap);
        assert!(store.get_confirmed(&key("ofx")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn confirm_overrides_provisional() {
        let store = InMemoryRatingStore::new();
        store
            .remember(
                &key("xe"),
                RatingRecord::new(rating(dec!(4.0)), RatingProvenance::ProviderDefault),
            )
            .await
            .unwrap();
        store.confirm(&key("xe"), rating(dec!(3.9))).await.unwrap();
        assert_eq!(store.get_confirmed(&key("xe")).await.unwrap(), Some(rating(dec!(3.9))));
    }

    #[tokio::test]
    async fn concurrent_confirmations_for_different_providers() {
        let store = InMemoryRatingStore::new();
        let writes = ["a", "b", "c", "d"].map(|k| {
            let store = store.clone();
            async move { store.confirm(&key(k), rating(dec!(4.2))).await }
        });
        for result in futures::future::join_all(writes).await {
            assert_ok!(result);
        }
        assert_eq!(store.snapshot().await.unwrap().len(), 4);
    }
}
