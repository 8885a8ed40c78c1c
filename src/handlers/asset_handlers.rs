//! Serves stored assets for the local object-store backend, so that
//! `<distribution-base>/<storage-path>` URLs resolve without a CDN.

use crate::{errors::AppError, services::asset_key::media_type_for_key, state::AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

/// `GET /assets/{*key}`: stream an object from the configured bucket.
pub async fn get_asset(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let ingest = &state.ingest;
    let file = ingest.blobs.open(&ingest.settings.bucket, &key).await?;
    let len = file
        .metadata()
        .await
        .map_err(|e| AppError::internal(e.to_string()))?
        .len();

    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(media_type_for_key(&key)),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );
    Ok(response)
}
