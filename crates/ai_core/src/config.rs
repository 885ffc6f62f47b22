//! Configuration for the classifier engine

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::InferenceError, ports::ImageSize};

/// Serialized model formats the engine can load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// ONNX graph (`.onnx`)
    Onnx,
    /// TensorFlow frozen graph (`.pb`)
    Tensorflow,
}

impl ModelFormat {
    /// Infer the format from a model file's extension
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("onnx") => Ok(Self::Onnx),
            Some("pb") => Ok(Self::Tensorflow),
            Some("h5" | "keras") => Err(InferenceError::UnsupportedFormat(format!(
                "{} is a Keras archive; export it to ONNX (e.g. with tf2onnx) first",
                path.display()
            ))),
            Some(other) => Err(InferenceError::UnsupportedFormat(format!(
                "unknown extension '.{other}' for {}",
                path.display()
            ))),
            None => Err(InferenceError::UnsupportedFormat(format!(
                "cannot infer format of {} without an extension",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Onnx => write!(f, "onnx"),
            Self::Tensorflow => write!(f, "tensorflow"),
        }
    }
}

/// Configuration for the classifier engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path of the model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Explicit model format; inferred from the extension when unset
    #[serde(default)]
    pub format: Option<ModelFormat>,

    /// Width the image is stretched to before inference
    #[serde(default = "default_input_side")]
    pub input_width: u32,

    /// Height the image is stretched to before inference
    #[serde(default = "default_input_side")]
    pub input_height: u32,
}

fn default_model_path() -> String {
    "tomato_dcnn_proposed_final.onnx".to_string()
}

const fn default_input_side() -> u32 {
    227
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            format: None,
            input_width: default_input_side(),
            input_height: default_input_side(),
        }
    }
}

impl ClassifierConfig {
    /// Config for a model at `path`, everything else default
    pub fn for_model(path: impl Into<String>) -> Self {
        Self {
            model_path: path.into(),
            ..Default::default()
        }
    }

    /// Target image size
    pub const fn input_size(&self) -> ImageSize {
        ImageSize::new(self.input_width, self.input_height)
    }

    /// Configured format, or the one implied by the model path
    pub fn resolved_format(&self) -> Result<ModelFormat, InferenceError> {
        match self.format {
            Some(format) => Ok(format),
            None => ModelFormat::from_path(Path::new(&self.model_path)),
        }
    }
}
