//! # HTTP Mid-Market Rate Service
//!
//! Rate feed queried with `?from=&to=` and answering
//! `{"rate": 1.17, "timestamp": "2024-01-01T00:00:00Z"}`. The timestamp may
//! also be Unix seconds, or absent.

use crate::domain::value_objects::{CurrencyCode, Timestamp};
use crate::infrastructure::rates::traits::{MidMarketRate, MidMarketRateService};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::http_client::HttpClient;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Secs(i64),
    Text(String),
}

impl RawTimestamp {
    fn resolve(&self) -> Option<Timestamp> {
        match self {
            Self::Secs(secs) => Timestamp::from_secs(*secs),
            Self::Text(text) => Timestamp::parse_rfc3339(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatePayload {
    rate: Decimal,
    #[serde(default)]
    timestamp: Option<RawTimestamp>,
}

/// [`MidMarketRateService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMidMarketRateService {
    endpoint: String,
    client: HttpClient,
}

impl HttpMidMarketRateService {
    /// Creates a service for `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, client: HttpClient) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl MidMarketRateService for HttpMidMarketRateService {
    async fn fetch_mid_market_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> SourceResult<MidMarketRate> {
        let params = [("from", from.as_str()), ("to", to.as_str())];
        let payload: RatePayload = self.client.get_with_params(&self.endpoint, &params).await?;

        if payload.rate <= Decimal::ZERO {
            return Err(SourceError::malformed_payload(format!(
                "non-positive mid-market rate {}",
                payload.rate
            )));
        }

        let timestamp = payload
            .timestamp
            .as_ref()
            .and_then(RawTimestamp::resolve)
            .unwrap_or_else(Timestamp::now);

        Ok(MidMarketRate {
            rate: payload.rate,
            timestamp,
        })
    }
}
