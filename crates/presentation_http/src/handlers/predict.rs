//! Prediction handler

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use domain::Prediction;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{error::ApiError, state::AppState};

/// Multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

/// Prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Label of the most likely class
    pub class: String,
    /// Score of that class as produced by the model
    pub confidence: f32,
    /// Every score the model produced, in class table order
    pub raw: Vec<f32>,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            class: prediction.label,
            confidence: prediction.confidence,
            raw: prediction.raw,
        }
    }
}

/// True for any `image/*` media type
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.trim_start()
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    })
}

/// Classify an uploaded image
///
/// The content type is checked before any byte of the upload is read.
#[instrument(skip(state, multipart))]
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::UnprocessableEntity(e.body_text()))?;
    let image = read_image_field(&mut multipart).await?;

    let prediction = state.prediction_service.predict(image).await?;

    info!(
        class = %prediction.label,
        confidence = prediction.confidence,
        "Image classified"
    );

    Ok(Json(prediction.into()))
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Skipping unexpected multipart field");
            continue;
        }

        if !is_image_content_type(field.content_type()) {
            return Err(ApiError::BadRequest("File must be an image".to_string()));
        }

        let file_name = field.file_name().map(ToString::to_string);
        let bytes = field.bytes().await?;
        debug!(file_name = ?file_name, bytes = bytes.len(), "Upload received");
        return Ok(bytes.to_vec());
    }

    Err(ApiError::UnprocessableEntity("No file uploaded".to_string()))
}
