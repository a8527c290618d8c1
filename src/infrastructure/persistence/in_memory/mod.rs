//! # In-Memory Repositories
//!
//! In-memory implementations for tests and single-process deployments.
//!
//! - [`InMemoryRatingStore`]: provider rating cache

pub mod rating_store;

pub use rating_store::InMemoryRatingStore;
