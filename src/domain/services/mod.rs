//! # Domain Services
//!
//! Domain logic that doesn't naturally belong to a single entity or
//! value object.
//!
//! ## Services
//!
//! - [`synthetic_pricing`]: policy-driven quotes for providers without live pricing
//! - [`deduplication`]: one quote per provider key, by channel priority
//! - [`margin`]: margin against the baseline rate

pub mod deduplication;
pub mod margin;
pub mod synthetic_pricing;

pub use deduplication::{DedupOutcome, deduplicate};
pub use margin::{MarginNormalizer, margin_percentage};
pub use synthetic_pricing::{
    DeliveryTiers, FeeSchedule, MarkupTiers, SyntheticProviderPolicy, SyntheticQuoteGenerator,
    default_roster,
};
