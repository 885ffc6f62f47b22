//! Classifier port - Interface for image classification

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for turning raw image bytes into a model score vector
///
/// Implementations own the loaded model; it is immutable for the life of
/// the process and shared by every request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClassifierPort: Send + Sync {
    /// Decode, resize, normalize and run the model on one uploaded image
    ///
    /// Returns the model's raw output row, one score per class.
    async fn classify(&self, image: Vec<u8>) -> Result<Vec<f32>, ApplicationError>;

    /// Name of the loaded model
    fn model_name(&self) -> String;
}
