//! AI Core - Image preprocessing and model execution
//!
//! Provides the typed classifier contract ("f32 tensor of shape
//! `[1, H, W, 3]` in, score vector out") and a tract-backed engine that loads
//! an ONNX or TensorFlow frozen-graph model once and runs it read-only.

pub mod config;
pub mod error;
pub mod ports;
pub mod tract;
pub mod vision;

pub use config::{ClassifierConfig, ModelFormat};
pub use error::InferenceError;
pub use ports::{ImageClassifier, ImageSize, InputTensor};
pub use tract::TractClassifier;
pub use vision::preprocess;
