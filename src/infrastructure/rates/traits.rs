//! # Mid-Market Rate Service Trait
//!
//! Port for external mid-market rate feeds.

use crate::domain::value_objects::{CurrencyCode, Timestamp};
use crate::infrastructure::sources::error::SourceResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mid-market rate as published by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidMarketRate {
    /// Destination units per source unit.
    pub rate: Decimal,
    /// When the feed observed the rate.
    pub timestamp: Timestamp,
}

/// An external mid-market rate feed.
#[async_trait]
pub trait MidMarketRateService: Send + Sync + fmt::Debug {
    /// Fetches the current mid-market rate for `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the feed is unreachable, answers with an
    /// error or returns an unusable rate.
    async fn fetch_mid_market_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> SourceResult<MidMarketRate>;
}
