//! VideoStore: the metadata collaborator holding video records.
//!
//! The upload pipeline needs exactly two operations: fetch a record by id and
//! write it back. Fetch/check/update is not transactional; two concurrent
//! uploads for the same video race and the last update wins.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::video::Video;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("video `{0}` not found")]
    VideoNotFound(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> StoreResult<Video>;

    /// Persist every mutable field of `video`. Bumps `updated_at`.
    async fn update_video(&self, video: &Video) -> StoreResult<Video>;

    /// Readiness check.
    async fn ping(&self) -> StoreResult<()>;
}

const MIGRATION: &str = include_str!("../../migrations/0001_init.sql");

/// Apply the embedded schema. Statements are idempotent.
pub async fn run_migrations(db: &SqlitePool) -> StoreResult<()> {
    let statements = MIGRATION
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    tracing::info!("Running {} migration statements...", statements.len());

    for stmt in statements {
        debug!("Executing migration SQL: {}", stmt);
        sqlx::query(stmt).execute(db).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct SqliteVideoStore {
    db: SqlitePool,
}

impl SqliteVideoStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new record. Video creation belongs to another service; this
    /// exists for seeding and tests.
    #[cfg(test)]
    pub async fn insert_video(&self, video: &Video) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO videos (id, created_at, updated_at, title, description,
                                 thumbnail_url, video_url, user_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(video.id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.user_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl VideoStore for SqliteVideoStore {
    async fn get_video(&self, id: Uuid) -> StoreResult<Video> {
        sqlx::query_as::<_, Video>(
            "SELECT id, created_at, updated_at, title, description,
                    thumbnail_url, video_url, user_id
             FROM videos WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::VideoNotFound(id),
            other => StoreError::Sqlx(other),
        })
    }

    async fn update_video(&self, video: &Video) -> StoreResult<Video> {
        let updated_at = Utc::now();
        sqlx::query_as::<_, Video>(
            "UPDATE videos
             SET title = ?, description = ?, thumbnail_url = ?, video_url = ?,
                 updated_at = ?
             WHERE id = ?
             RETURNING id, created_at, updated_at, title, description,
                       thumbnail_url, video_url, user_id",
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(updated_at)
        .bind(video.id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::VideoNotFound(video.id),
            other => StoreError::Sqlx(other),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
