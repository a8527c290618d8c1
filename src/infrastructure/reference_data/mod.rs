//! # Reference Data
//!
//! Read-only tables loaded once at startup.

pub mod static_rating_map;

pub use static_rating_map::{ReferenceDataError, StaticRatingMap};
