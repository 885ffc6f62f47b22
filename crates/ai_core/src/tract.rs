//! tract-backed classifier engine
//!
//! Loads the model once, pins its input to `f32 [1, H, W, 3]`, optimises the
//! graph and keeps the resulting plan for the life of the process. Plans are
//! only read while running, so concurrent `predict` calls need no lock.

use std::{fmt, path::Path, time::Instant};

use tracing::{debug, info, instrument};
use tract_onnx::prelude::*;

use crate::{
    config::{ClassifierConfig, ModelFormat},
    error::InferenceError,
    ports::{CHANNELS, ImageClassifier, ImageSize, InputTensor},
};

type Plan = TypedRunnableModel<TypedModel>;

/// Image classifier running an ONNX or TensorFlow model through tract
pub struct TractClassifier {
    name: String,
    format: ModelFormat,
    size: ImageSize,
    plan: Plan,
}

impl fmt::Debug for TractClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TractClassifier")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl TractClassifier {
    /// Load and optimise the model described by `config`
    #[instrument(skip(config), fields(path = %config.model_path))]
    pub fn load(config: &ClassifierConfig) -> Result<Self, InferenceError> {
        let path = Path::new(&config.model_path);
        let format = config.resolved_format()?;
        let size = config.input_size();
        let load_err = |e: TractError| InferenceError::model_load(&config.model_path, format!("{e:#}"));

        if !path.is_file() {
            return Err(InferenceError::model_load(
                &config.model_path,
                "file does not exist",
            ));
        }

        let start = Instant::now();
        let model = match format {
            ModelFormat::Onnx => tract_onnx::onnx().model_for_path(path),
            ModelFormat::Tensorflow => tract_tensorflow::tensorflow().model_for_path(path),
        }
        .map_err(load_err)?;

        let input_fact = f32::fact([1, size.height as usize, size.width as usize, CHANNELS]);
        let plan = model
            .with_input_fact(0, input_fact.into())
            .and_then(InferenceModel::into_optimized)
            .and_then(TypedModel::into_runnable)
            .map_err(load_err)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        info!(
            model = %name,
            format = %format,
            input = %size,
            load_ms = start.elapsed().as_millis() as u64,
            "Model loaded"
        );

        Ok(Self {
            name,
            format,
            size,
            plan,
        })
    }
}

impl ImageClassifier for TractClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_size(&self) -> ImageSize {
        self.size
    }

    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, InferenceError> {
        if input.size() != self.size {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![1, self.size.height as usize, self.size.width as usize, CHANNELS],
                actual: input.shape().to_vec(),
            });
        }

        let start = Instant::now();
        let tensor = Tensor::from_shape(&input.shape(), input.as_slice())
            .map_err(|e| InferenceError::Runtime(format!("{e:#}")))?;
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::Runtime(format!("{e:#}")))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InvalidOutput("model produced no outputs".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(format!("{e:#}")))?;
        let scores = first_row(view.shape(), view.iter().copied())?;

        debug!(
            model = %self.name,
            width = scores.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Forward pass completed"
        );

        Ok(scores)
    }
}

/// First row of a `[batch, ...]` output laid out in standard order
fn first_row(
    shape: &[usize],
    values: impl Iterator<Item = f32>,
) -> Result<Vec<f32>, InferenceError> {
    let row_len = match shape {
        [] => {
            return Err(InferenceError::InvalidOutput(
                "model output is a scalar".to_string(),
            ));
        },
        [0, ..] => {
            return Err(InferenceError::InvalidOutput(
                "model output has an empty batch".to_string(),
            ));
        },
        [len] => *len,
        [_, rest @ ..] => rest.iter().product(),
    };

    if row_len == 0 {
        return Err(InferenceError::InvalidOutput(
            "model output row is empty".to_string(),
        ));
    }

    Ok(values.take(row_len).collect())
}
