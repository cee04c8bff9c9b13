use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Missing 'image' file in request")]
    MissingFile,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Image too large (max: {max} bytes)")]
    ImageTooLarge { max: usize },

    #[error("Text recognition failed: {0}")]
    RecognitionFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScanError::MissingFile | ScanError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ScanError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ScanError::InitializationError(_)
            | ScanError::RecognitionFailure(_)
            | ScanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ScanError::InitializationError(_) => "INIT_ERROR",
            ScanError::MissingFile => "MISSING_FILE",
            ScanError::InvalidUpload(_) => "INVALID_UPLOAD",
            ScanError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            ScanError::RecognitionFailure(_) => "RECOGNITION_FAILED",
            ScanError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}
