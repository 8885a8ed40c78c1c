//! HTTP handlers for video and thumbnail uploads.
//!
//! Handlers own the HTTP concerns (path id, bearer token, multipart framing)
//! and stream the matching form field into `IngestService` without buffering.

use crate::{
    auth,
    errors::AppError,
    models::video::Video,
    services::ingest_service::{IngestError, UploadRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::HeaderMap,
};
use futures::StreamExt;
use tracing::info;
use uuid::Uuid;

pub const VIDEO_FIELD: &str = "video";
pub const THUMBNAIL_FIELD: &str = "thumbnail";

#[derive(Debug, Clone, Copy)]
enum UploadKind {
    Video,
    Thumbnail,
}

impl UploadKind {
    fn field(self) -> &'static str {
        match self {
            UploadKind::Video => VIDEO_FIELD,
            UploadKind::Thumbnail => THUMBNAIL_FIELD,
        }
    }
}

/// `POST /api/video_upload/{video_id}`: multipart field `video`.
pub async fn upload_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, AppError> {
    handle_upload(state, &video_id, &headers, multipart, UploadKind::Video).await
}

/// `POST /api/thumbnail_upload/{video_id}`: multipart field `thumbnail`.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, AppError> {
    handle_upload(state, &video_id, &headers, multipart, UploadKind::Thumbnail).await
}

async fn handle_upload(
    state: AppState,
    raw_video_id: &str,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
    kind: UploadKind,
) -> Result<Json<Video>, AppError> {
    let video_id = Uuid::parse_str(raw_video_id)
        .map_err(|_| IngestError::InvalidVideoId(raw_video_id.to_string()))?;
    let user_id = auth::authenticate(headers, &state.jwt_secret).map_err(IngestError::from)?;
    let mut multipart =
        multipart.map_err(|rejection| IngestError::MalformedForm(rejection.body_text()))?;

    info!(%video_id, %user_id, ?kind, "upload started");

    let field_name = kind.field();
    while let Some(field) = multipart.next_field().await.map_err(IngestError::from)? {
        if field.name() != Some(field_name) {
            continue;
        }

        let request = UploadRequest {
            video_id,
            user_id,
            content_type: field.content_type().map(str::to_string),
            payload: field.map(|chunk| chunk.map_err(IngestError::from)),
        };
        let video = match kind {
            UploadKind::Video => state.ingest.ingest_video(request).await?,
            UploadKind::Thumbnail => state.ingest.ingest_thumbnail(request).await?,
        };
        return Ok(Json(video));
    }

    Err(IngestError::MissingField(field_name).into())
}
