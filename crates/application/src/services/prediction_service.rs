//! Prediction service - Classify one uploaded image

use std::{fmt, sync::Arc, time::Instant};

use domain::{ClassTable, Prediction};
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::ClassifierPort};

/// Service turning an uploaded image into a labelled prediction
pub struct PredictionService {
    classifier: Arc<dyn ClassifierPort>,
    classes: ClassTable,
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Create a service using the tomato leaf class table
    pub fn new(classifier: Arc<dyn ClassifierPort>) -> Self {
        Self::with_classes(classifier, ClassTable::tomato_leaf())
    }

    /// Create a service with a custom class table
    pub fn with_classes(classifier: Arc<dyn ClassifierPort>, classes: ClassTable) -> Self {
        Self {
            classifier,
            classes,
        }
    }

    /// Classify one image
    ///
    /// Every request is independent; nothing is cached or persisted.
    #[instrument(skip(self, image), fields(image_bytes = image.len()))]
    pub async fn predict(&self, image: Vec<u8>) -> Result<Prediction, ApplicationError> {
        let start = Instant::now();

        let scores = self.classifier.classify(image).await?;
        let width = scores.len();
        let prediction = Prediction::from_scores(&self.classes, scores).inspect_err(|e| {
            warn!(error = %e, width, classes = self.classes.len(), "Model output rejected");
        })?;

        if width != self.classes.len() {
            warn!(
                width,
                classes = self.classes.len(),
                "Model output width differs from class table"
            );
        }

        debug!(
            model = %self.classifier.model_name(),
            label = %prediction.label,
            confidence = prediction.confidence,
            latency_ms = start.elapsed().as_millis() as u64,
            "Prediction completed"
        );

        Ok(prediction)
    }

    /// Number of known classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// The label table predictions are mapped through
    pub const fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> String {
        self.classifier.model_name()
    }
}
