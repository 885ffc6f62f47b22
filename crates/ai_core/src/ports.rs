//! Classifier contract shared by every model backend

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Number of color channels the model consumes
pub const CHANNELS: usize = 3;

/// Width and height of the model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of scalars in one NHWC image of this size
    pub const fn element_count(self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(227, 227)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single-image batch in NHWC layout, values in `[0.0, 1.0]`
#[derive(Clone, PartialEq)]
pub struct InputTensor {
    size: ImageSize,
    data: Vec<f32>,
}

impl InputTensor {
    /// Wrap an NHWC buffer for one RGB image of `size`
    pub fn new(size: ImageSize, data: Vec<f32>) -> Result<Self, InferenceError> {
        if data.len() != size.element_count() {
            return Err(InferenceError::ShapeMismatch {
                expected: Self::shape_for(size).to_vec(),
                actual: vec![data.len()],
            });
        }
        Ok(Self { size, data })
    }

    const fn shape_for(size: ImageSize) -> [usize; 4] {
        [1, size.height as usize, size.width as usize, CHANNELS]
    }

    /// `[1, height, width, 3]`
    pub const fn shape(&self) -> [usize; 4] {
        Self::shape_for(self.size)
    }

    pub const fn size(&self) -> ImageSize {
        self.size
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl fmt::Debug for InputTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputTensor")
            .field("shape", &self.shape())
            .finish_non_exhaustive()
    }
}

/// A loaded image classification model
///
/// Implementations are immutable after construction and must tolerate
/// concurrent `predict` calls from several threads.
pub trait ImageClassifier: Send + Sync {
    /// Human readable model identifier
    fn name(&self) -> &str;

    /// Size the model expects its input image to have
    fn input_size(&self) -> ImageSize;

    /// Run the model on a one-image batch and return the first output row
    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, InferenceError>;
}
