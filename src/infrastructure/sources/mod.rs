//! # Quote Sources
//!
//! Adapters for external pricing sources.
//!
//! - [`QuoteSource`]: the port every source implements
//! - [`GenericAggregatorSource`]: multi-provider comparison endpoint
//! - [`DedicatedProviderSource`]: single-provider live integration
//! - [`HttpClient`]: shared reqwest wrapper

pub mod dedicated;
pub mod error;
pub mod generic_aggregator;
pub mod http_client;
pub mod traits;

pub use dedicated::DedicatedProviderSource;
pub use error::{SourceError, SourceResult};
pub use generic_aggregator::GenericAggregatorSource;
pub use http_client::HttpClient;
pub use traits::QuoteSource;
