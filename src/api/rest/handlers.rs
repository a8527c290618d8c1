//! # REST Handlers
//!
//! Request handlers for REST endpoints.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/quotes` - Aggregate and sort quotes for a transfer
//! - `POST /api/v1/ratings/{provider_key}` - Rating confirmed by the view

use crate::application::error::{AggregationError, ApplicationError};
use crate::application::services::{AggregationOutcome, AggregationStats, QuoteAggregationEngine};
use crate::domain::entities::{BaselineRate, Quote, TransferRequest};
use crate::domain::value_objects::{ProviderKey, SortCriterion, SortDirection};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The aggregation engine.
    pub engine: Arc<QuoteAggregationEngine>,
}

// ============================================================================
// Error Response
// ============================================================================

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Whether the client should offer a retry.
    pub retryable: bool,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable: false,
            details: None,
        }
    }

    /// Marks the error as retryable.
    #[must_use]
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// Attaches details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_validation() {
            return validation_error(&err.to_string());
        }
        match &err {
            ApplicationError::Aggregation(aggregation) => {
                let failed: Vec<String> = match aggregation {
                    AggregationError::AllSourcesFailed(failures) => {
                        failures.iter().map(ToString::to_string).collect()
                    }
                    _ => Vec::new(),
                };
                let mut body = ErrorResponse::new(aggregation.code(), aggregation.to_string())
                    .retryable();
                if !failed.is_empty() {
                    body = body.with_details(serde_json::json!({ "failed_sources": failed }));
                }
                (StatusCode::SERVICE_UNAVAILABLE, Json(body))
            }
            ApplicationError::Repository(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("STORE_UNAVAILABLE", err.to_string()).retryable()),
            ),
            _ => internal_error(&err.to_string()),
        }
    }
}

// ============================================================================
// Quote DTOs
// ============================================================================

/// Query parameters of `GET /quotes`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteQuery {
    /// Source currency.
    pub from: String,
    /// Destination currency.
    pub to: String,
    /// Amount to send, in the source currency.
    pub amount: Decimal,
    /// Sort criterion (`amount`, `rate`, `fees`, `rating`).
    pub sort: Option<String>,
    /// Sort direction (`asc`, `desc`); defaults per criterion.
    pub direction: Option<String>,
}

/// Quote response DTO.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    /// Quote ID.
    pub id: String,
    /// Normalized provider key.
    pub provider_key: String,
    /// Display name.
    pub provider_name: String,
    /// Logo reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_ref: Option<String>,
    /// Source channel.
    pub source_channel: String,
    /// True for live dedicated pricing.
    pub is_live: bool,
    /// Effective rate.
    pub rate: Decimal,
    /// Baseline used for the margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<Decimal>,
    /// Signed margin against the baseline, in percent.
    pub margin_percentage: Decimal,
    /// Fee in the source currency.
    pub transfer_fee: Decimal,
    /// Amount sent.
    pub send_amount: Decimal,
    /// Amount the recipient receives.
    pub amount_received: Decimal,
    /// Delivery descriptor.
    pub transfer_time: String,
    /// Minimum delivery hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hours: Option<u32>,
    /// Maximum delivery hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hours: Option<u32>,
    /// Resolved rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
    /// Where the rating came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_provenance: Option<String>,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        let range = quote.transfer_time().range();
        Self {
            id: quote.id().to_string(),
            provider_key: quote.provider_key().to_string(),
            provider_name: quote.provider_name().to_string(),
            logo_ref: quote.logo_ref().map(str::to_string),
            source_channel: quote.source_channel().to_string(),
            is_live: quote.source_channel().is_live(),
            rate: quote.rate(),
            base_rate: quote.base_rate(),
            margin_percentage: quote.margin_percentage(),
            transfer_fee: quote.transfer_fee(),
            send_amount: quote.send_amount(),
            amount_received: quote.amount_received(),
            transfer_time: quote.transfer_time().descriptor().to_string(),
            min_hours: range.map(|r| r.min_hours),
            max_hours: range.map(|r| r.max_hours),
            rating: quote.rating().map(|r| r.value()),
            rating_provenance: quote.rating_provenance().map(|p| p.to_string()),
        }
    }
}

/// Baseline response DTO.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineResponse {
    /// Mid-market rate.
    pub rate: Decimal,
    /// Strategy that produced it.
    pub source: String,
    /// True when the rate is an approximation or the neutral default.
    pub degraded: bool,
    /// Resolution timestamp (ISO 8601).
    pub resolved_at: String,
}

impl From<&BaselineRate> for BaselineResponse {
    fn from(baseline: &BaselineRate) -> Self {
        Self {
            rate: baseline.rate(),
            source: baseline.source().to_string(),
            degraded: baseline.is_degraded(),
            resolved_at: baseline.resolved_at().to_iso8601(),
        }
    }
}

/// Run counters DTO.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Run ID.
    pub run_id: String,
    /// Sources polled.
    pub sources_queried: usize,
    /// Sources that answered.
    pub sources_responded: usize,
    /// Sources that failed.
    pub failed_sources: Vec<String>,
    /// Synthetic quotes added.
    pub synthetic_added: usize,
    /// True when only synthetic quotes were available.
    pub synthetic_only: bool,
    /// Duplicates removed.
    pub duplicates_collapsed: usize,
    /// Run duration.
    pub duration_ms: u64,
}

impl From<&AggregationStats> for StatsResponse {
    fn from(stats: &AggregationStats) -> Self {
        Self {
            run_id: stats.run_id.to_string(),
            sources_queried: stats.sources_queried,
            sources_responded: stats.sources_responded,
            failed_sources: stats.failed_sources.clone(),
            synthetic_added: stats.synthetic_added,
            synthetic_only: stats.synthetic_only,
            duplicates_collapsed: stats.duplicates_collapsed,
            duration_ms: stats.duration_ms,
        }
    }
}

/// Response of `GET /quotes`.
#[derive(Debug, Clone, Serialize)]
pub struct QuotesResponse {
    /// Sorted quotes.
    pub quotes: Vec<QuoteResponse>,
    /// Highest amount received, independent of the sort.
    pub best_deal: QuoteResponse,
    /// Baseline every margin refers to.
    pub baseline: BaselineResponse,
    /// Criterion applied.
    pub sort: SortCriterion,
    /// Direction applied.
    pub direction: SortDirection,
    /// True when the baseline is approximate or no real quote arrived.
    pub degraded: bool,
    /// Run counters.
    pub stats: StatsResponse,
}

impl QuotesResponse {
    fn new(
        outcome: &AggregationOutcome,
        sorted: &[Quote],
        sort: SortCriterion,
        direction: SortDirection,
    ) -> Self {
        Self {
            quotes: sorted.iter().map(QuoteResponse::from).collect(),
            best_deal: QuoteResponse::from(&outcome.best_deal),
            baseline: BaselineResponse::from(&outcome.baseline),
            sort,
            direction,
            degraded: outcome.is_degraded(),
            stats: StatsResponse::from(&outcome.stats),
        }
    }
}

/// Body of `POST /ratings/{provider_key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRatingRequest {
    /// Rating shown to the user, in `[0, 5]`.
    pub rating: Decimal,
}

// ============================================================================
// Handlers
// ============================================================================

/// Aggregates quotes for a transfer and sorts them.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` for bad currencies, amounts or sort options.
/// Returns a retryable 503 when no source produced a quote.
#[instrument(skip(state))]
pub async fn get_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuotesResponse>, ApiError> {
    let request = TransferRequest::parse(&query.from, &query.to, query.amount)
        .map_err(ApplicationError::from)?;
    let (sort, direction) = parse_sort(query.sort.as_deref(), query.direction.as_deref())?;

    let outcome = state
        .engine
        .aggregate(&request)
        .await
        .map_err(ApplicationError::from)?;
    let sorted = state
        .engine
        .sort(outcome.quotes.clone(), sort, direction)
        .await;

    info!(
        pair = %request.pair(),
        quotes = sorted.len(),
        %sort,
        %direction,
        "quotes served"
    );
    Ok(Json(QuotesResponse::new(&outcome, &sorted, sort, direction)))
}

/// Records a rating the view has displayed for a provider.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` for an unusable key or a rating outside
/// `[0, 5]`.
#[instrument(skip(state, body))]
pub async fn confirm_rating(
    State(state): State<Arc<AppState>>,
    Path(provider_key): Path<String>,
    Json(body): Json<ConfirmRatingRequest>,
) -> Result<StatusCode, ApiError> {
    let key = ProviderKey::new(&provider_key).map_err(ApplicationError::from)?;
    state
        .engine
        .on_rating_confirmed(&key, body.rating)
        .await
        .map_err(|e| {
            warn!(provider = %key, error = %e, "rating confirmation rejected");
            ApiError::from(e)
        })?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of configured quote sources.
    pub sources: usize,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sources: state.engine.collector().sources().len(),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_sort(
    sort: Option<&str>,
    direction: Option<&str>,
) -> Result<(SortCriterion, SortDirection), ApiError> {
    let criterion = match sort {
        Some(raw) => raw
            .parse::<SortCriterion>()
            .map_err(|_| validation_error(&format!("invalid sort criterion: {raw}")))?,
        None => SortCriterion::default(),
    };
    let direction = match direction {
        Some(raw) => raw
            .parse::<SortDirection>()
            .map_err(|_| validation_error(&format!("invalid sort direction: {raw}")))?,
        None => criterion.default_direction(),
    };
    Ok((criterion, direction))
}

fn validation_error(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", message)),
    )
}
