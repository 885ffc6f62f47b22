//! Entities - Objects derived from a single classification

mod prediction;

pub use prediction::{Prediction, argmax};
