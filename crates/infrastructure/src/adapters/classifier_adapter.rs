//! Classifier adapter - Implements ClassifierPort using ai_core

use std::{fmt, sync::Arc, time::Instant};

use ai_core::{ClassifierConfig, ImageClassifier, InferenceError, TractClassifier, preprocess};
use application::{error::ApplicationError, ports::ClassifierPort};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter running preprocessing and the model on the blocking thread pool
#[derive(Clone)]
pub struct ClassifierAdapter {
    engine: Arc<dyn ImageClassifier>,
}

impl fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("model", &self.engine.name())
            .field("input_size", &self.engine.input_size())
            .finish()
    }
}

impl ClassifierAdapter {
    /// Wrap an already loaded engine
    pub fn new(engine: Arc<dyn ImageClassifier>) -> Self {
        Self { engine }
    }

    /// Load the tract engine described by `config`
    pub fn load(config: &ClassifierConfig) -> Result<Self, ApplicationError> {
        let engine = TractClassifier::load(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(engine)))
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        if e.is_input_error() {
            ApplicationError::Preprocessing(e.to_string())
        } else {
            ApplicationError::Inference(e.to_string())
        }
    }
}

#[async_trait]
impl ClassifierPort for ClassifierAdapter {
    #[instrument(skip(self, image), fields(image_bytes = image.len()))]
    async fn classify(&self, image: Vec<u8>) -> Result<Vec<f32>, ApplicationError> {
        let start = Instant::now();
        let engine = Arc::clone(&self.engine);

        let scores = tokio::task::spawn_blocking(move || {
            let input = preprocess(&image, engine.input_size())?;
            engine.predict(&input)
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("classification task failed: {e}")))?
        .map_err(Self::map_error)?;

        debug!(
            model = %self.engine.name(),
            width = scores.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Image classified"
        );

        Ok(scores)
    }

    fn model_name(&self) -> String {
        self.engine.name().to_string()
    }
}
