//! # Domain Layer
//!
//! Pure domain model: entities, value objects, errors and the services
//! that operate on quotes without touching the outside world.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
