//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`CurrencyCode`], [`CurrencyPair`]: validated currency identifiers
//! - [`ProviderKey`], [`ProviderIdentity`]: provider identity and its normalized key
//! - [`Rating`]: provider rating in `[0, 5]`
//! - [`TransferTime`]: delivery-time descriptor
//! - [`QuoteId`], [`RunId`]: UUID-based identifiers
//! - [`Timestamp`]: UTC timestamp
//! - Domain enums: [`SourceChannel`], [`RatingProvenance`], [`BaselineSource`],
//!   [`SortCriterion`], [`SortDirection`]

pub mod currency;
pub mod enums;
pub mod ids;
pub mod provider_key;
pub mod rating;
pub mod timestamp;
pub mod transfer_time;

pub use currency::{CurrencyCode, CurrencyPair};
pub use enums::{
    BaselineSource, ParseEnumError, RatingProvenance, SortCriterion, SortDirection, SourceChannel,
};
pub use ids::{QuoteId, RunId};
pub use provider_key::{ProviderIdentity, ProviderKey};
pub use rating::Rating;
pub use timestamp::Timestamp;
pub use transfer_time::{HoursRange, TransferTime};
