//! # Quote Source Trait
//!
//! Port definition for everything that can price a transfer.
//!
//! A source is either a generic aggregator reporting many providers, or a
//! dedicated integration reporting exactly one provider. The collector
//! polls all of them concurrently and tolerates any subset failing.

use crate::domain::entities::{Quote, TransferRequest};
use crate::domain::value_objects::{ProviderKey, SourceChannel};
use crate::infrastructure::sources::error::SourceResult;
use async_trait::async_trait;
use std::fmt;

/// A source of live quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync + fmt::Debug {
    /// Returns a stable identifier for logs and failure reports.
    fn source_id(&self) -> &str;

    /// Returns the channel every quote from this source carries.
    fn channel(&self) -> SourceChannel;

    /// Returns the single provider this source reports, for dedicated
    /// integrations.
    ///
    /// The collector drops generic-aggregator quotes for any provider that
    /// has a dedicated source configured.
    fn dedicated_provider(&self) -> Option<&ProviderKey> {
        None
    }

    /// Fetches quotes for a request.
    ///
    /// # Errors
    ///
    /// - `SourceError::Timeout` - The source did not answer in time
    /// - `SourceError::Connection` - The source is unreachable
    /// - `SourceError::Status` - The source answered with an error status
    /// - `SourceError::MalformedPayload` - The payload could not be decoded
    /// - `SourceError::Unsupported` - The source does not price this pair
    async fn fetch_quotes(&self, request: &TransferRequest) -> SourceResult<Vec<Quote>>;
}
