//! Application services

mod prediction_service;

pub use prediction_service::PredictionService;
