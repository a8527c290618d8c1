//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The only state that outlives an aggregation run is the provider rating
//! cache, abstracted by [`RatingStore`]. Entries are keyed by
//! [`ProviderKey`] and superseded, never evicted.
//!
//! # Examples
//!
//! ```ignore
//! use remit_compare::infrastructure::persistence::traits::RatingStore;
//!
//! async fn confirmed_count(store: &impl RatingStore) -> usize {
//!     store.snapshot().await.unwrap().iter().filter(|(_, r)| r.is_confirmed()).count()
//! }
//! ```

use crate::domain::entities::RatingRecord;
use crate::domain::value_objects::{ProviderKey, Rating};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for rating store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store could not serve the request.
    #[error("rating store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Cache of resolved and confirmed provider ratings.
///
/// Writes are keyed by provider and last-write-wins; writes for
/// different providers never conflict.
#[async_trait]
pub trait RatingStore: Send + Sync + fmt::Debug {
    /// Returns the record for a provider.
    async fn get(&self, key: &ProviderKey) -> RepositoryResult<Option<RatingRecord>>;

    /// Returns the value confirmed by the rendering layer, if any.
    async fn get_confirmed(&self, key: &ProviderKey) -> RepositoryResult<Option<Rating>> {
        Ok(self
            .get(key)
            .await?
            .filter(RatingRecord::is_confirmed)
            .map(|record| record.value()))
    }

    /// Stores a confirmed rating, replacing whatever was there.
    async fn confirm(&self, key: &ProviderKey, rating: Rating) -> RepositoryResult<()>;

    /// Stores a resolved (non-confirmed) record unless a confirmed one is
    /// already present. Returns whether the record was stored.
    async fn remember(&self, key: &ProviderKey, record: RatingRecord) -> RepositoryResult<bool>;

    /// Returns every stored record.
    async fn snapshot(&self) -> RepositoryResult<Vec<(ProviderKey, RatingRecord)>>;

    /// Returns the number of stored records.
    async fn count(&self) -> RepositoryResult<u64>;
}
