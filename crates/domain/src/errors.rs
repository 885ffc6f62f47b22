//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The model produced no scores at all
    #[error("Model returned an empty score vector")]
    EmptyScores,

    /// The argmax of the scores does not address a known label
    #[error("Predicted class index {index} out of range (max {len})")]
    ClassIndexOutOfRange { index: usize, len: usize },

    /// The model produced NaN or infinity, which has no JSON representation
    #[error("Model returned a non-finite score at index {index}")]
    NonFiniteScore { index: usize },

    /// The label table itself is unusable
    #[error("Invalid class table: {0}")]
    InvalidClassTable(String),
}

impl DomainError {
    /// Create an out-of-range error for a class table of `len` labels
    pub const fn class_index_out_of_range(index: usize, len: usize) -> Self {
        Self::ClassIndexOutOfRange { index, len }
    }
}
