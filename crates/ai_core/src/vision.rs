//! Image preprocessing stages
//!
//! decode → RGB → stretch to the model size → scale to `[0, 1]`. Each stage
//! is exposed on its own so failures can be attributed to a single step.

use image::{DynamicImage, RgbImage, imageops::FilterType};
use tracing::trace;

use crate::{
    error::InferenceError,
    ports::{ImageSize, InputTensor},
};

/// Bicubic, the default resampling filter of the upstream training pipeline
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Decode an encoded image (PNG, JPEG, ...) sniffed from its magic bytes
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
    if bytes.is_empty() {
        return Err(InferenceError::Decode("upload is empty".to_string()));
    }
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(InferenceError::Decode("image has no pixels".to_string()));
    }
    Ok(image)
}

/// Force three-channel RGB, dropping alpha and expanding gray or palette images
pub fn to_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Stretch to exactly `size`, ignoring the original aspect ratio
pub fn resize(image: &RgbImage, size: ImageSize) -> RgbImage {
    if image.dimensions() == (size.width, size.height) {
        return image.clone();
    }
    image::imageops::resize(image, size.width, size.height, RESIZE_FILTER)
}

/// Scale every channel from `[0, 255]` to `[0.0, 1.0]` and add the batch dimension
pub fn normalize(image: &RgbImage) -> Result<InputTensor, InferenceError> {
    let size = ImageSize::new(image.width(), image.height());
    let data = image
        .as_raw()
        .iter()
        .map(|&channel| f32::from(channel) / 255.0)
        .collect();
    InputTensor::new(size, data)
}

/// Run every stage in order
pub fn preprocess(bytes: &[u8], size: ImageSize) -> Result<InputTensor, InferenceError> {
    let decoded = decode(bytes)?;
    trace!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Image decoded"
    );
    let rgb = to_rgb(decoded);
    let resized = resize(&rgb, size);
    normalize(&resized)
}
