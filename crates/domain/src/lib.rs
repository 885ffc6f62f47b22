//! Domain layer for the tomato leaf classifier
//!
//! Contains the class label table, the prediction entity and domain errors.
//! This layer performs no I/O and knows nothing about images or models.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
