//! # Persistence Layer
//!
//! ## Repository Traits (Ports)
//!
//! - [`RatingStore`]: provider rating cache shared across aggregation runs
//!
//! ## Implementations
//!
//! - `in_memory`: `DashMap`-backed store

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryRatingStore;
pub use traits::{RatingStore, RepositoryError, RepositoryResult};
