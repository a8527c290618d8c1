//! # Infrastructure Layer
//!
//! Adapters for the outside world.
//!
//! - [`sources`]: quote sources (generic aggregator, dedicated providers)
//! - [`rates`]: mid-market rate feed and static approximations
//! - [`persistence`]: rating store
//! - [`reference_data`]: static rating map

pub mod persistence;
pub mod rates;
pub mod reference_data;
pub mod sources;
