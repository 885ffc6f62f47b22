//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The upload could not be turned into a model input
    #[error("{0}")]
    Preprocessing(String),

    /// The model failed to produce scores
    #[error("{0}")]
    Inference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// True when the model's winning index has no label in the class table
    pub const fn is_class_table_mismatch(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::ClassIndexOutOfRange { .. })
        )
    }
}
