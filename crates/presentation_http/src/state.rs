//! Application state shared across handlers

use std::sync::Arc;

use application::PredictionService;
use infrastructure::AppConfig;

/// Shared application state
///
/// Everything in here is immutable after startup; handlers only read it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Prediction service wrapping the loaded model
    pub prediction_service: Arc<PredictionService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(prediction_service: PredictionService, config: AppConfig) -> Self {
        Self {
            prediction_service: Arc::new(prediction_service),
            config: Arc::new(config),
        }
    }
}
