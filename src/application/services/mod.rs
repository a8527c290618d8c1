//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`QuoteAggregationEngine`]: end-to-end comparison runs
//! - [`ProviderResultCollector`]: concurrent fan-out over quote sources
//! - [`BaselineResolver`]: mid-market baseline strategies
//! - [`RatingResolver`]: cascading rating lookups and view confirmations
//! - [`RankingEngine`]: stable sorting and best-deal selection

pub mod baseline_resolver;
pub mod collector;
pub mod quote_aggregation;
pub mod ranking;
pub mod rating_resolver;

pub use baseline_resolver::BaselineResolver;
pub use collector::{Collection, ProviderResultCollector, SourceFailure};
pub use quote_aggregation::{AggregationOutcome, AggregationStats, QuoteAggregationEngine};
pub use ranking::RankingEngine;
pub use rating_resolver::{RatingLookup, RatingPolicy, RatingResolver};
