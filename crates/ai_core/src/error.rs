//! Inference errors

use thiserror::Error;

/// Errors that can occur while preparing an image or running the model
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Model artifact missing, corrupt or not loadable
    #[error("Failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    /// Model file in a format no backend understands
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// Uploaded bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Tensor does not have the shape the model was built for
    #[error("Input shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The model failed while executing
    #[error("Inference failed: {0}")]
    Runtime(String),

    /// The model ran but its output is unusable
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}

impl InferenceError {
    /// Create a model load error
    pub fn model_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the failure is caused by the uploaded image rather than the model
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<image::ImageError> for InferenceError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}
