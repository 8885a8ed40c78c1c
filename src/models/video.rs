//! Represents a video record owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A video as seen by the metadata store.
///
/// The upload endpoints only ever overwrite `video_url` or `thumbnail_url`;
/// every other field is managed elsewhere.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Video {
    pub id: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub title: String,

    pub description: String,

    /// Public URL of the thumbnail image, once one has been uploaded.
    pub thumbnail_url: Option<String>,

    /// Public URL of the fast-start MP4, once one has been uploaded.
    pub video_url: Option<String>,

    /// The user allowed to upload media for this video.
    pub user_id: Uuid,
}

impl Video {
    #[cfg(test)]
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: title.into(),
            description: String::new(),
            thumbnail_url: None,
            video_url: None,
            user_id,
        }
    }
}
