//! # Generic Aggregator Source
//!
//! Multi-provider JSON endpoint queried with `?from=&to=&amount=`.
//!
//! Expected payload:
//!
//! ```json
//! {
//!   "providers": [
//!     {
//!       "code": "wise", "id": "provider_wise", "name": "Wise",
//!       "logo": "https://cdn.example/wise.svg",
//!       "rate": 1.1612, "fee": 3.69,
//!       "delivery": "Today", "min_hours": 0, "max_hours": 24,
//!       "rating": 4.6
//!     }
//!   ]
//! }
//! ```
//!
//! Only `name` and `rate` are required per entry. Entries that fail
//! validation are skipped; a payload that fails to decode fails the
//! whole source.

use crate::domain::entities::{Quote, QuoteBuilder, TransferRequest};
use crate::domain::value_objects::{ProviderIdentity, Rating, SourceChannel, TransferTime};
use crate::infrastructure::sources::error::SourceResult;
use crate::infrastructure::sources::http_client::HttpClient;
use crate::infrastructure::sources::traits::QuoteSource;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AggregatorPayload {
    providers: Vec<AggregatorEntry>,
}

#[derive(Debug, Deserialize)]
struct AggregatorEntry {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    logo: Option<String>,
    rate: Decimal,
    #[serde(default)]
    fee: Decimal,
    #[serde(default)]
    delivery: Option<String>,
    #[serde(default)]
    min_hours: Option<u32>,
    #[serde(default)]
    max_hours: Option<u32>,
    #[serde(default)]
    rating: Option<Decimal>,
}

impl AggregatorEntry {
    fn transfer_time(&self) -> TransferTime {
        let descriptor = self.delivery.clone().unwrap_or_default();
        match (self.min_hours, self.max_hours) {
            (Some(min), Some(max)) => TransferTime::within_hours(descriptor, min, max),
            (Some(hours), None) | (None, Some(hours)) => {
                TransferTime::within_hours(descriptor, hours, hours)
            }
            (None, None) => TransferTime::described(descriptor),
        }
    }

    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity {
            code: self.code.clone(),
            identifier: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Source backed by a multi-provider comparison endpoint.
#[derive(Debug, Clone)]
pub struct GenericAggregatorSource {
    source_id: String,
    endpoint: String,
    client: HttpClient,
}

impl GenericAggregatorSource {
    /// Creates a source for `endpoint`.
    #[must_use]
    pub fn new(source_id: impl Into<String>, endpoint: impl Into<String>, client: HttpClient) -> Self {
        Self {
            source_id: source_id.into(),
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn to_quotes(&self, payload: AggregatorPayload, request: &TransferRequest) -> Vec<Quote> {
        payload
            .providers
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut builder = QuoteBuilder::new(
                    entry.identity(),
                    SourceChannel::GenericAggregator,
                    entry.rate,
                    request.amount(),
                )
                .position(position)
                .source_id(self.source_id.clone())
                .transfer_fee(entry.fee)
                .transfer_time(entry.transfer_time());
                if let Some(logo) = &entry.logo {
                    builder = builder.logo_ref(logo.clone());
                }
                if let Some(raw) = entry.rating {
                    match Rating::new(raw) {
                        Ok(rating) => builder = builder.rating(rating),
                        Err(e) => debug!(provider = %entry.name, error = %e, "ignoring source rating"),
                    }
                }
                match builder.build() {
                    Ok(quote) => Some(quote),
                    Err(e) => {
                        warn!(
                            source = %self.source_id,
                            provider = %entry.name,
                            error = %e,
                            "skipping invalid aggregator entry"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl QuoteSource for GenericAggregatorSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn channel(&self) -> SourceChannel {
        SourceChannel::GenericAggregator
    }

    async fn fetch_quotes(&self, request: &TransferRequest) -> SourceResult<Vec<Quote>> {
        let (from, to) = (request.from_currency(), request.to_currency());
        let amount = request.amount().to_string();
        let params = [
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("amount", amount.as_str()),
        ];
        let payload: AggregatorPayload = self.client.get_with_params(&self.endpoint, &params).await?;
        Ok(self.to_quotes(payload, request))
    }
}
