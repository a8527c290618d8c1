//! # Dedicated Provider Source
//!
//! Live integration with a single provider's pricing endpoint.
//!
//! Expected payload:
//!
//! ```json
//! { "rate": 1.1655, "fee": 0.0, "delivery": "Within minutes", "min_hours": 0, "max_hours": 1 }
//! ```

use crate::domain::entities::{Quote, QuoteBuilder, TransferRequest};
use crate::domain::value_objects::{
    ProviderIdentity, ProviderKey, Rating, SourceChannel, TransferTime,
};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::http_client::HttpClient;
use crate::infrastructure::sources::traits::QuoteSource;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DedicatedPayload {
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

/// Source backed by one provider's own API.
#[derive(Debug, Clone)]
pub struct DedicatedProviderSource {
    source_id: String,
    identity: ProviderIdentity,
    provider_key: ProviderKey,
    logo_ref: Option<String>,
    endpoint: String,
    client: HttpClient,
}

impl DedicatedProviderSource {
    /// Creates a dedicated source for the provider described by `identity`.
    #[must_use]
    pub fn new(identity: ProviderIdentity, endpoint: impl Into<String>, client: HttpClient) -> Self {
        let provider_key = ProviderKey::derive(&identity, 0);
        Self {
            source_id: format!("dedicated:{provider_key}"),
            identity,
            provider_key,
            logo_ref: None,
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Sets the logo reference attached to produced quotes.
    #[must_use]
    pub fn with_logo_ref(mut self, logo_ref: impl Into<String>) -> Self {
        self.logo_ref = Some(logo_ref.into());
        self
    }

    /// Returns the provider key this source reports.
    #[must_use]
    pub fn provider_key(&self) -> &ProviderKey {
        &self.provider_key
    }
}

#[async_trait]
impl QuoteSource for DedicatedProviderSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn channel(&self) -> SourceChannel {
        SourceChannel::DedicatedLive
    }

    fn dedicated_provider(&self) -> Option<&ProviderKey> {
        Some(&self.provider_key)
    }

    async fn fetch_quotes(&self, request: &TransferRequest) -> SourceResult<Vec<Quote>> {
        let (from, to) = (request.from_currency(), request.to_currency());
        let amount = request.amount().to_string();
        let params = [
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("amount", amount.as_str()),
        ];
        let payload: DedicatedPayload = self.client.get_with_params(&self.endpoint, &params).await?;

        let descriptor = payload.delivery.unwrap_or_default();
        let transfer_time = match (payload.min_hours, payload.max_hours) {
            (Some(min), Some(max)) => TransferTime::within_hours(descriptor, min, max),
            _ => TransferTime::described(descriptor),
        };

        let mut builder = QuoteBuilder::new(
            self.identity.clone(),
            SourceChannel::DedicatedLive,
            payload.rate,
            request.amount(),
        )
        .source_id(self.source_id.clone())
        .transfer_fee(payload.fee)
        .transfer_time(transfer_time);
        if let Some(logo) = &self.logo_ref {
            builder = builder.logo_ref(logo.clone());
        }
        if let Some(rating) = payload.rating.and_then(|r| Rating::new(r).ok()) {
            builder = builder.rating(rating);
        }

        let quote = builder
            .build()
            .map_err(|e| SourceError::malformed_payload(e.to_string()))?;
        Ok(vec![quote])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TransferRequest {
        TransferRequest::parse("GBP", "EUR", dec!(1000)).unwrap()
    }

    fn source(server: &MockServer) -> DedicatedProviderSource {
        DedicatedProviderSource::new(
            ProviderIdentity::named("Wise").with_code("wise"),
            server.uri(),
            HttpClient::new(1000).unwrap(),
        )
    }

    #[test]
    fn reports_its_provider() {
        let s = DedicatedProviderSource::new(
            ProviderIdentity::named("Remitly"),
            "http://localhost",
            HttpClient::new(10).unwrap(),
        );
        assert_eq!(s.dedicated_provider().map(ProviderKey::as_str), Some("remitly"));
        assert_eq!(s.source_id(), "dedicated:remitly");
        assert_eq!(s.channel(), SourceChannel::DedicatedLive);
    }

    #[tokio::test]
    async fn builds_single_live_quote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("from", "GBP"))
            .and(query_param("to", "EUR"))
            .and(query_param("amount", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rate": 1.20, "fee": 0, "delivery": "Within minutes", "min_hours": 0, "max_hours": 1
            })))
            .mount(&server)
            .await;

        let quotes = source(&server).fetch_quotes(&request()).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].provider_key().as_str(), "wise");
        assert_eq!(quotes[0].rate(), dec!(1.20));
        assert_eq!(quotes[0].amount_received(), dec!(1200));
        assert_eq!(quotes[0].source_channel(), SourceChannel::DedicatedLive);
    }

    #[tokio::test]
    async fn non_positive_rate_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rate": -1})))
            .mount(&server)
            .await;

        let err = source(&server).fetch_quotes(&request()).await.unwrap_err();
        assert!(matches!(err, SourceError::MalformedPayload { .. }));
    }
}
