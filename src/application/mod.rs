//! # Application Layer
//!
//! Use-case orchestration on top of the domain model.

pub mod error;
pub mod services;

pub use error::{AggregationError, ApplicationError, ApplicationResult};
