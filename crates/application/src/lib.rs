//! Application layer - Use cases and orchestration
//!
//! Defines the classifier port and the prediction use case that turns an
//! uploaded image into a labelled prediction.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
