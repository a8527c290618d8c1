//! # Remit Compare
//!
//! Quote aggregation engine for international money transfer price
//! comparison: collects quotes from several providers, resolves a
//! mid-market baseline, deduplicates, normalizes margins, rates every
//! provider and ranks the result.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Quotes, baselines, ratings and the pure pricing services
//! - **Application Layer** (`application`): Collection, baseline and rating resolution, ranking
//! - **Infrastructure Layer** (`infrastructure`): HTTP sources, rate feeds, rating store, reference data
//! - **API Layer** (`api`): REST interface
//!
//! ## Example
//!
//! ```rust,ignore
//! use remit_compare::bootstrap::build_engine;
//! use remit_compare::config::AppConfig;
//! use remit_compare::domain::entities::TransferRequest;
//! use rust_decimal_macros::dec;
//!
//! let engine = build_engine(&AppConfig::load()?)?;
//! let outcome = engine
//!     .aggregate(&TransferRequest::parse("GBP", "EUR", dec!(1000))?)
//!     .await?;
//! println!("best deal: {}", outcome.best_deal);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
