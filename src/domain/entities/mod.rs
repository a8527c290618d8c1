//! # Domain Entities
//!
//! - [`Quote`]: one provider's offer
//! - [`BaselineRate`]: the run's mid-market reference
//! - [`RatingRecord`]: a cached provider rating
//! - [`TransferRequest`]: the comparison request

pub mod baseline;
pub mod quote;
pub mod rating_record;
pub mod transfer_request;

pub use baseline::BaselineRate;
pub use quote::{Quote, QuoteBuilder};
pub use rating_record::RatingRecord;
pub use transfer_request::TransferRequest;
