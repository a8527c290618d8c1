//! # REST Routes
//!
//! Route definitions for the REST API.
//!
//! # Route Structure
//!
//! ```text
//! /api/v1
//! ├── /health                   GET  - Health check
//! ├── /quotes                   GET  - Aggregate and sort quotes
//! └── /ratings/{provider_key}   POST - Rating confirmed by the view
//! ```

use crate::api::rest::handlers::{AppState, confirm_rating, get_quotes, health_check};
use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn api_v1() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/quotes", get(get_quotes))
        .route("/ratings/{provider_key}", post(confirm_rating))
}

/// Creates the REST API router with all endpoints and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Creates a minimal router for testing without middleware.
#[cfg(test)]
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new().nest("/api/v1", api_v1()).with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::collector::tests::StubSource;
    use crate::application::services::{
        BaselineResolver, ProviderResultCollector, QuoteAggregationEngine, RatingPolicy,
        RatingResolver,
    };
    use crate::domain::services::SyntheticQuoteGenerator;
    use crate::domain::value_objects::ProviderKey;
    use crate::infrastructure::persistence::InMemoryRatingStore;
    use crate::infrastructure::rates::StaticRateTable;
    use crate::infrastructure::reference_data::StaticRatingMap;
    use crate::infrastructure::sources::{QuoteSource, SourceError};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn create_test_state(sources: Vec<Arc<dyn QuoteSource>>) -> Arc<AppState> {
        let engine = QuoteAggregationEngine::new(
            ProviderResultCollector::new(sources, Duration::from_millis(200)),
            BaselineResolver::new(
                None,
                StaticRateTable::with_defaults(),
                ProviderKey::normalize("wise"),
                Duration::from_millis(200),
            ),
            SyntheticQuoteGenerator::with_default_roster(),
            RatingResolver::new(
                Arc::new(InMemoryRatingStore::new()),
                Arc::new(StaticRatingMap::with_defaults()),
                RatingPolicy::default(),
            ),
        );
        Arc::new(AppState {
            engine: Arc::new(engine),
        })
    }

    fn healthy_sources() -> Vec<Arc<dyn QuoteSource>> {
        vec![
            Arc::new(StubSource::aggregator(
                "agg",
                &[("Remitly", dec!(1.15), dec!(2)), ("Wise", dec!(1.10), dec!(0))],
            )),
            Arc::new(StubSource::dedicated("Wise", dec!(1.165), dec!(3.5))),
        ]
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_check_endpoint() {
        let router = create_test_router(create_test_state(healthy_sources()));
        let response = router.oneshot(get_request("/api/v1/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["sources"], 2);
    }

    #[tokio::test]
    async fn quotes_endpoint_sorts_by_amount() {
        let router = create_test_router(create_test_state(healthy_sources()));
        let response = router
            .oneshot(get_request("/api/v1/quotes?from=GBP&to=EUR&amount=1000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["sort"], "amount");
        assert_eq!(body["direction"], "desc");
        assert_eq!(body["baseline"]["source"], "reference-provider");

        let quotes = body["quotes"].as_array().unwrap();
        let wise: Vec<_> = quotes
            .iter()
            .filter(|q| q["provider_key"] == "wise")
            .collect();
        assert_eq!(wise.len(), 1);
        assert_eq!(wise[0]["is_live"], true);
        assert_eq!(
            body["best_deal"]["amount_received"],
            quotes[0]["amount_received"]
        );
    }

    #[tokio::test]
    async fn quotes_endpoint_rejects_bad_currency() {
        let router = create_test_router(create_test_state(healthy_sources()));
        let response = router
            .oneshot(get_request("/api/v1/quotes?from=GB&to=EUR&amount=1000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn quotes_endpoint_rejects_unknown_sort() {
        let router = create_test_router(create_test_state(healthy_sources()));
        let response = router
            .oneshot(get_request("/api/v1/quotes?from=GBP&to=EUR&amount=1000&sort=cheapest"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn all_sources_down_is_retryable_503() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![Arc::new(StubSource::failing(
            "agg",
            SourceError::status(500, "boom"),
        ))];
        let router = create_test_router(create_test_state(sources));
        let response = router
            .oneshot(get_request("/api/v1/quotes?from=GBP&to=EUR&amount=1000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["retryable"], true);
        assert_eq!(body["code"], "ALL_SOURCES_FAILED");
    }

    #[tokio::test]
    async fn empty_sources_serve_degraded_synthetic_quotes() {
        let sources: Vec<Arc<dyn QuoteSource>> = vec![Arc::new(StubSource::aggregator("agg", &[]))];
        let router = create_test_router(create_test_state(sources));
        let response = router
            .oneshot(get_request("/api/v1/quotes?from=GBP&to=EUR&amount=1000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["degraded"], true);
        assert_eq!(body["stats"]["synthetic_only"], true);
        let quotes = body["quotes"].as_array().unwrap();
        assert!(!quotes.is_empty());
        assert!(quotes.iter().all(|q| q["is_live"] == false));
    }

    #[tokio::test]
    async fn confirm_rating_returns_no_content() {
        let state = create_test_state(healthy_sources());
        let router = create_test_router(state.clone());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/ratings/Remitly")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"rating": 4.6}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let key = ProviderKey::new("remitly").unwrap();
        let stored = state.engine.ratings().confirmed_rating(&key).await;
        assert_eq!(stored.map(|r| r.value()), Some(dec!(4.6)));
    }

    #[tokio::test]
    async fn confirm_rating_rejects_out_of_range() {
        let router = create_test_router(create_test_state(healthy_sources()));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/ratings/wise")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"rating": 9}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
