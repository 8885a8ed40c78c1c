use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::services::{
    blob_store::BlobError,
    ingest_service::IngestError,
    media::MediaError,
};

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let status = match &err {
            IngestError::InvalidVideoId(_)
            | IngestError::MissingField(_)
            | IngestError::MalformedForm(_)
            | IngestError::UnsupportedMediaType(_)
            | IngestError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            IngestError::Media(MediaError::NoVideoStream(_))
            | IngestError::Media(MediaError::InvalidDimensions { .. }) => StatusCode::BAD_REQUEST,
            IngestError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            IngestError::Forbidden(_) => StatusCode::FORBIDDEN,
            IngestError::VideoNotFound(_) => StatusCode::NOT_FOUND,
            IngestError::Media(_)
            | IngestError::Storage(_)
            | IngestError::Lookup(_)
            | IngestError::Persistence(_)
            | IngestError::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details stay in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &err {
                IngestError::Media(_) => "processing the video failed",
                IngestError::Storage(_) => "storing the upload failed",
                IngestError::Lookup(_) => "looking up the video record failed",
                IngestError::Persistence(_) => "updating the video record failed",
                _ => "internal error",
            }
            .to_string()
        } else {
            err.to_string()
        };

        AppError::new(status, message)
    }
}

impl From<BlobError> for AppError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::NotFound { .. } => AppError::new(StatusCode::NOT_FOUND, err.to_string()),
            BlobError::InvalidKey(_) | BlobError::InvalidBucket(_) => {
                AppError::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            BlobError::Io(_) => AppError::internal(err.to_string()),
        }
    }
}
