//! API error handling
//!
//! Every failure leaves the server as `{"detail": <message>, "code": <code>}`
//! with a status separating client mistakes (4xx) from server faults (5xx).

use application::ApplicationError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The model predicted an index the label table does not cover
    #[error("Class table mismatch: {0}")]
    ClassTableMismatch(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub detail: String,
    /// Machine-readable error code
    pub code: String,
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ClassTableMismatch(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::UnprocessableEntity(_) => "unprocessable_entity",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::ClassTableMismatch(_) => "class_index_out_of_range",
            Self::Internal(_) => "internal_error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::UnprocessableEntity(msg)
            | Self::PayloadTooLarge(msg)
            | Self::ClassTableMismatch(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), detail = %self.detail(), "Request failed");
        } else {
            warn!(code = self.code(), detail = %self.detail(), "Request rejected");
        }

        let body = ErrorResponse {
            detail: self.detail().to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_class_table_mismatch() {
            return Self::ClassTableMismatch(err.to_string());
        }
        Self::Internal(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use domain::DomainError;

    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn api_error_bad_request_message() {
        let err = ApiError::BadRequest("File must be an image".to_string());
        assert_eq!(err.to_string(), "Bad request: File must be an image");
    }

    #[test]
    fn api_error_internal_message() {
        let err = ApiError::Internal("unexpected".to_string());
        assert_eq!(err.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::BadRequest(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::UnprocessableEntity(String::new()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::PayloadTooLarge(String::new()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::ClassTableMismatch(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn class_table_mismatch_has_distinct_code() {
        let mismatch = ApiError::ClassTableMismatch(String::new());
        let generic = ApiError::Internal(String::new());
        assert_eq!(mismatch.status(), generic.status());
        assert_ne!(mismatch.code(), generic.code());
    }

    #[test]
    fn error_response_serialization() {
        let resp = ErrorResponse {
            detail: "File must be an image".to_string(),
            code: "bad_request".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"detail":"File must be an image","code":"bad_request"}"#);
    }

    #[test]
    fn application_error_out_of_range_converts_to_mismatch() {
        let source: ApplicationError = DomainError::class_index_out_of_range(10, 10).into();
        let result: ApiError = source.into();
        let ApiError::ClassTableMismatch(msg) = result else {
            unreachable!("Expected ClassTableMismatch");
        };
        assert_eq!(msg, "Predicted class index 10 out of range (max 10)");
    }

    #[test]
    fn application_error_empty_scores_converts_to_internal() {
        let source: ApplicationError = DomainError::EmptyScores.into();
        let result: ApiError = source.into();
        assert!(matches!(result, ApiError::Internal(_)));
    }

    #[test]
    fn application_error_preprocessing_keeps_message() {
        let source = ApplicationError::Preprocessing("Failed to decode image: bad".to_string());
        let result: ApiError = source.into();
        let ApiError::Internal(msg) = result else {
            unreachable!("Expected Internal");
        };
        assert_eq!(msg, "Failed to decode image: bad");
    }

    #[test]
    fn application_error_inference_converts_to_internal() {
        let source = ApplicationError::Inference("Inference failed: oom".to_string());
        let result: ApiError = source.into();
        assert!(matches!(result, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn into_response_bad_request_body() {
        let (status, body) = body_of(ApiError::BadRequest("File must be an image".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "File must be an image");
        assert_eq!(body.code, "bad_request");
    }

    #[tokio::test]
    async fn into_response_internal_exposes_detail() {
        let (status, body) = body_of(ApiError::Internal("Failed to decode image: eof".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "Failed to decode image: eof");
        assert_eq!(body.code, "internal_error");
    }

    #[tokio::test]
    async fn into_response_mismatch_body() {
        let (status, body) = body_of(ApiError::ClassTableMismatch("index 10".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "class_index_out_of_range");
    }

    #[test]
    fn api_error_has_debug() {
        let debug = format!("{:?}", ApiError::PayloadTooLarge("big".to_string()));
        assert!(debug.contains("PayloadTooLarge"));
    }
}
