//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/quotes?from=&to=&amount=&sort=&direction=` - Aggregate, then sort
//! - `POST /api/v1/ratings/{provider_key}` - Rating confirmed by the view, `204` on success
//!
//! Aggregation failures answer `503` with `"retryable": true`; bad input
//! answers `400`.

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, BaselineResponse, ConfirmRatingRequest, ErrorResponse, HealthResponse,
    QuoteQuery, QuoteResponse, QuotesResponse, StatsResponse,
};
pub use routes::create_router;
