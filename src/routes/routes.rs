//! Defines routes for the ingest service.
//!
//! ## Structure
//! - **Upload endpoints** (bearer token required)
//!   - `POST /api/video_upload/{video_id}`:     multipart field `video`
//!   - `POST /api/thumbnail_upload/{video_id}`: multipart field `thumbnail`
//!
//! - **Asset endpoint**
//!   - `GET  /assets/{*key}`: stored objects, e.g. `landscape/<key>.mp4`
//!
//! Each upload route carries its own body limit.

use crate::{
    handlers::{
        asset_handlers::get_asset,
        health_handlers::{healthz, readyz},
        upload_handlers::{upload_thumbnail, upload_video},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Hard caps on request bodies, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_video_bytes: usize,
    pub max_thumbnail_bytes: usize,
}

/// Build and return the router for all routes.
pub fn routes(limits: UploadLimits) -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(
            "/api/video_upload/{video_id}",
            post(upload_video).layer(DefaultBodyLimit::max(limits.max_video_bytes)),
        )
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(upload_thumbnail).layer(DefaultBodyLimit::max(limits.max_thumbnail_bytes)),
        )
        .route("/assets/{*key}", get(get_asset))
}
