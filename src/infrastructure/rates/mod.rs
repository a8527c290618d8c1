//! # Rate Services
//!
//! Baseline inputs: the external mid-market feed and the built-in
//! approximation table.

pub mod http;
pub mod static_table;
pub mod traits;

pub use http::HttpMidMarketRateService;
pub use static_table::StaticRateTable;
pub use traits::{MidMarketRate, MidMarketRateService};
