//! Shared state handed to every handler.

use std::sync::Arc;

use crate::services::ingest_service::IngestService;

#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestService,
    /// HS256 key for access tokens.
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(ingest: IngestService, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            ingest,
            jwt_secret: jwt_secret.into(),
        }
    }
}
