//! src/services/ingest_service.rs
//!
//! IngestService: the upload pipeline. A video upload moves strictly forward
//! through
//!
//! `Received → Staged → Classified → Remuxed → Persisted → Recorded`
//!
//! against request-scoped scratch files that are removed when the run ends,
//! whatever the outcome. The record update only happens after the object store
//! accepted the payload; a failed update after a successful put leaves an
//! orphaned object, which is not repaired here.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, pin_mut};
use std::{
    fmt,
    io::{self, SeekFrom},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tokio_util::io::ReaderStream;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    aspect::classify,
    asset_key::{new_asset_key, normalize_media_type, with_prefix},
    blob_store::{BlobError, BlobStore, once_stream},
    media::{MediaError, Prober, Remuxer, first_video_stream},
    scratch::Scratch,
    video_store::{StoreError, VideoStore},
};
use crate::{auth::AuthError, models::video::Video};

pub const VIDEO_MEDIA_TYPES: [&str; 1] = ["video/mp4"];
pub const THUMBNAIL_MEDIA_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

const THUMBNAIL_PREFIX: &str = "thumbnails";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid video id `{0}`")]
    InvalidVideoId(String),
    #[error("missing form field `{0}`")]
    MissingField(&'static str),
    #[error("malformed multipart body: {0}")]
    MalformedForm(String),
    #[error("upload too large: {0}")]
    PayloadTooLarge(String),
    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),
    #[error("payload is not a valid {0} file")]
    InvalidPayload(&'static str),
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error("not authorized to update video `{0}`")]
    Forbidden(Uuid),
    #[error("video `{0}` not found")]
    VideoNotFound(Uuid),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("storing object failed: {0}")]
    Storage(#[from] BlobError),
    #[error("video record lookup failed: {0}")]
    Lookup(StoreError),
    #[error("video record update failed: {0}")]
    Persistence(StoreError),
    #[error("staging upload failed: {0}")]
    Staging(#[from] io::Error),
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VideoNotFound(id) => IngestError::VideoNotFound(id),
            other => IngestError::Lookup(other),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for IngestError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            IngestError::PayloadTooLarge(err.body_text())
        } else {
            IngestError::MalformedForm(err.body_text())
        }
    }
}

/// Where a pipeline run currently is. Stages never go backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Staged,
    Classified,
    Remuxed,
    Persisted,
    Recorded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Staged => "staged",
            Stage::Classified => "classified",
            Stage::Remuxed => "remuxed",
            Stage::Persisted => "persisted",
            Stage::Recorded => "recorded",
        };
        f.write_str(name)
    }
}

/// One authenticated upload, as handed over by the HTTP layer.
pub struct UploadRequest<S> {
    pub video_id: Uuid,
    pub user_id: Uuid,
    /// Declared content type of the form field, if any.
    pub content_type: Option<String>,
    pub payload: S,
}

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub staging_dir: PathBuf,
    pub bucket: String,
    /// Public base URL under which stored objects are reachable.
    pub distribution_base: String,
}

#[derive(Clone)]
pub struct IngestService {
    pub prober: Arc<dyn Prober>,
    pub remuxer: Arc<dyn Remuxer>,
    pub blobs: Arc<dyn BlobStore>,
    pub videos: Arc<dyn VideoStore>,
    pub settings: Arc<IngestSettings>,
}

impl IngestService {
    pub fn new(
        prober: Arc<dyn Prober>,
        remuxer: Arc<dyn Remuxer>,
        blobs: Arc<dyn BlobStore>,
        videos: Arc<dyn VideoStore>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            prober,
            remuxer,
            blobs,
            videos,
            settings: Arc::new(settings),
        }
    }

    /// `<distribution-base>/<storage-path>`.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.settings.distribution_base.trim_end_matches('/'),
            key
        )
    }

    /// Run the full video pipeline and return the updated record.
    ///
    /// Staging and remuxed files are removed before this returns, on success
    /// and on every error.
    pub async fn ingest_video<S>(&self, request: UploadRequest<S>) -> Result<Video, IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let video_id = request.video_id;
        let user_id = request.user_id;
        let mut scratch = Scratch::new(&self.settings.staging_dir);
        let mut stage = Stage::Received;

        let result = self
            .run_video_pipeline(request, &mut scratch, &mut stage)
            .await;
        scratch.release();

        match &result {
            Ok(video) => info!(
                %video_id,
                %user_id,
                video_url = video.video_url.as_deref().unwrap_or_default(),
                "video upload complete"
            ),
            Err(err) => warn!(%video_id, %user_id, %stage, error = %err, "video upload failed"),
        }
        result
    }

    async fn run_video_pipeline<S>(
        &self,
        request: UploadRequest<S>,
        scratch: &mut Scratch,
        stage: &mut Stage,
    ) -> Result<Video, IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let media_type = accept_media_type(request.content_type.as_deref(), &VIDEO_MEDIA_TYPES)?;
        // Fail unauthorized uploads before spending disk and subprocess time.
        self.owned_video(request.video_id, request.user_id).await?;

        *stage = Stage::Staged;
        let staged = scratch.reserve("upload-", ".mp4")?;
        let size_bytes = stage_payload(&staged, request.payload).await?;
        info!(video_id = %request.video_id, size_bytes, "upload staged");

        *stage = Stage::Classified;
        let streams = self.prober.probe(&staged).await?;
        let stream = first_video_stream(&streams, &staged)?;
        let orientation = classify(stream.width, stream.height)?;
        info!(
            video_id = %request.video_id,
            width = stream.width,
            height = stream.height,
            %orientation,
            "classified upload"
        );

        *stage = Stage::Remuxed;
        let remuxed = scratch.reserve("faststart-", ".mp4")?;
        self.remuxer.remux(&staged, &remuxed).await?;

        *stage = Stage::Persisted;
        let key = with_prefix(orientation.as_prefix(), &new_asset_key(&media_type));
        let body = ReaderStream::new(File::open(&remuxed).await?).boxed();
        let stored = self
            .blobs
            .put(&self.settings.bucket, &key, body, &media_type)
            .await?;
        info!(key = %stored.key, size_bytes = stored.size_bytes, etag = %stored.etag, "video stored");

        *stage = Stage::Recorded;
        let mut video = self.owned_video(request.video_id, request.user_id).await?;
        video.video_url = Some(self.public_url(&key));
        let updated = self
            .videos
            .update_video(&video)
            .await
            .map_err(IngestError::Persistence)?;
        Ok(updated)
    }

    /// Store a thumbnail image and point the record at it. Images are small
    /// and need no processing, so they are buffered instead of staged.
    pub async fn ingest_thumbnail<S>(
        &self,
        request: UploadRequest<S>,
    ) -> Result<Video, IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let video_id = request.video_id;
        let result = self.run_thumbnail_pipeline(request).await;
        match &result {
            Ok(video) => info!(
                %video_id,
                thumbnail_url = video.thumbnail_url.as_deref().unwrap_or_default(),
                "thumbnail upload complete"
            ),
            Err(err) => warn!(%video_id, error = %err, "thumbnail upload failed"),
        }
        result
    }

    async fn run_thumbnail_pipeline<S>(
        &self,
        request: UploadRequest<S>,
    ) -> Result<Video, IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let media_type =
            accept_media_type(request.content_type.as_deref(), &THUMBNAIL_MEDIA_TYPES)?;
        self.owned_video(request.video_id, request.user_id).await?;

        let payload = request.payload;
        pin_mut!(payload);
        let mut buf = BytesMut::new();
        while let Some(chunk) = payload.next().await {
            buf.extend_from_slice(&chunk?);
        }
        if buf.is_empty() {
            return Err(IngestError::InvalidPayload("image"));
        }

        let key = with_prefix(THUMBNAIL_PREFIX, &new_asset_key(&media_type));
        self.blobs
            .put(
                &self.settings.bucket,
                &key,
                once_stream(buf.freeze()),
                &media_type,
            )
            .await?;

        let mut video = self.owned_video(request.video_id, request.user_id).await?;
        video.thumbnail_url = Some(self.public_url(&key));
        self.videos
            .update_video(&video)
            .await
            .map_err(IngestError::Persistence)
    }

    /// Fetch a record and make sure `user_id` owns it.
    async fn owned_video(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, IngestError> {
        let video = self.videos.get_video(video_id).await?;
        if video.user_id != user_id {
            return Err(IngestError::Forbidden(video_id));
        }
        Ok(video)
    }

    /// Make sure the staging dir exists.
    pub async fn ensure_staging_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.settings.staging_dir).await
    }
}

/// Normalize a declared content type and check it against `allowed`.
pub fn accept_media_type(declared: Option<&str>, allowed: &[&str]) -> Result<String, IngestError> {
    let declared = declared.unwrap_or("");
    let media_type = normalize_media_type(declared);
    if allowed.contains(&media_type.as_str()) {
        Ok(media_type)
    } else {
        Err(IngestError::UnsupportedMediaType(declared.to_string()))
    }
}

/// Box types that may open an MP4 or QuickTime file. Anything deeper is left
/// to the prober.
const TOP_LEVEL_BOXES: [&[u8; 4]; 7] = [
    b"ftyp", b"free", b"skip", b"wide", b"mdat", b"moov", b"pnot",
];

/// Stream the payload into `path`, make it durable, then rewind and check that
/// the leading bytes name a top-level ISO-BMFF box. Returns the byte count.
async fn stage_payload<S>(path: &Path, payload: S) -> Result<u64, IngestError>
where
    S: Stream<Item = Result<Bytes, IngestError>>,
{
    pin_mut!(payload);
    let mut file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await?;

    let mut size_bytes: u64 = 0;
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        size_bytes += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    file.sync_all().await?;

    file.seek(SeekFrom::Start(0)).await?;
    let mut header = [0u8; 8];
    match file.read_exact(&mut header).await {
        Ok(_) if TOP_LEVEL_BOXES.iter().any(|b| header[4..8] == b[..]) => Ok(size_bytes),
        Ok(_) => Err(IngestError::InvalidPayload("mp4")),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            Err(IngestError::InvalidPayload("mp4"))
        }
        Err(err) => Err(IngestError::Staging(err)),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::services::{
        blob_store::fake::FakeBlobStore,
        media::{
            StreamDescriptor, StreamKind,
            fake::{FakeProber, FakeRemuxer},
        },
    };
    use std::sync::atomic::Ordering;

    fn request(
        h: &Harness,
        content_type: &str,
        bytes: &'static [u8],
    ) -> UploadRequest<impl Stream<Item = Result<Bytes, IngestError>> + Send> {
        UploadRequest {
            video_id: h.video.id,
            user_id: h.owner,
            content_type: Some(content_type.to_string()),
            payload: payload(bytes),
        }
    }

    fn stored_key(h: &Harness) -> String {
        let objects = h.blobs.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        objects.keys().next().unwrap().clone()
    }

    #[tokio::test]
    async fn test_landscape_upload() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );

        let video = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap();

        let url = video.video_url.unwrap();
        assert!(url.starts_with("https://cdn.example.com/landscape/"), "{}", url);
        assert!(url.ends_with(".mp4"));
        // bucket prefix is not part of the public URL
        let key = stored_key(&h);
        assert!(key.starts_with("videos/landscape/"));
        assert!(url.ends_with(key.trim_start_matches("videos/")));

        let objects = h.blobs.objects.lock().unwrap();
        let (data, content_type) = objects.values().next().unwrap();
        assert_eq!(data.as_slice(), MP4_BYTES);
        assert_eq!(content_type, "video/mp4");
        drop(objects);

        assert_eq!(
            h.videos.video(h.video.id).unwrap().video_url.as_deref(),
            Some(url.as_str())
        );
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_portrait_and_other_prefixes() {
        for (w, h_px, prefix) in [(1080, 1920, "portrait/"), (640, 480, "other/")] {
            let h = Harness::new(
                FakeProber::with_video(w, h_px),
                FakeRemuxer::copying(),
                FakeBlobStore::default(),
            );
            let video = h
                .service
                .ingest_video(request(&h, "video/mp4; codecs=avc1", MP4_BYTES))
                .await
                .unwrap();
            let url = video.video_url.unwrap();
            assert!(url.contains(prefix), "{} missing {}", url, prefix);
            assert!(h.staging_is_empty());
        }
    }

    #[tokio::test]
    async fn test_first_video_stream_decides() {
        let h = Harness::new(
            FakeProber::with_streams(vec![
                StreamDescriptor {
                    kind: StreamKind::Audio,
                    width: 0,
                    height: 0,
                },
                StreamDescriptor::video(720, 1280),
                StreamDescriptor::video(1920, 1080),
            ]),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let video = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap();
        assert!(video.video_url.unwrap().contains("/portrait/"));
    }

    #[tokio::test]
    async fn test_unsupported_media_type_touches_nothing() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/quicktime", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedMediaType(t) if t == "video/quicktime"));
        assert_eq!(h.videos.call_count(), 0);
        assert_eq!(h.blobs.put_count(), 0);
        assert_eq!(h.prober.calls.load(Ordering::SeqCst), 0);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_before_staging() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let mut req = request(&h, "video/mp4", MP4_BYTES);
        req.user_id = Uuid::new_v4();
        let err = h.service.ingest_video(req).await.unwrap_err();
        assert!(matches!(err, IngestError::Forbidden(id) if id == h.video.id));
        assert_eq!(h.prober.calls.load(Ordering::SeqCst), 0);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_unknown_video() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let mut req = request(&h, "video/mp4", MP4_BYTES);
        req.video_id = Uuid::new_v4();
        let err = h.service.ingest_video(req).await.unwrap_err();
        assert!(matches!(err, IngestError::VideoNotFound(_)));
    }

    #[tokio::test]
    async fn test_non_mp4_payload_rejected_after_staging() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", b"GIF89a not a movie"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidPayload("mp4")));
        assert_eq!(h.prober.calls.load(Ordering::SeqCst), 0);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_leading_free_box_is_accepted() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let video = h
            .service
            .ingest_video(request(&h, "video/mp4", FREE_THEN_FTYP))
            .await
            .unwrap();
        assert!(video.video_url.unwrap().contains("/landscape/"));
        assert_eq!(h.prober.calls.load(Ordering::SeqCst), 1);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_probe_failure_cleans_up() {
        let h = Harness::new(
            FakeProber::failing("moov atom not found"),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Media(MediaError::Probe(_))));
        assert_eq!(h.remuxer.calls.load(Ordering::SeqCst), 0);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_no_video_stream() {
        let h = Harness::new(
            FakeProber::with_streams(vec![StreamDescriptor {
                kind: StreamKind::Audio,
                width: 0,
                height: 0,
            }]),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Media(MediaError::NoVideoStream(_))));
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_zero_dimensions_are_not_classified() {
        let h = Harness::new(
            FakeProber::with_video(1920, 0),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Media(MediaError::InvalidDimensions { .. })
        ));
        assert_eq!(h.blobs.put_count(), 0);
    }

    #[tokio::test]
    async fn test_remux_failure_cleans_up_and_skips_storage() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::failing(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Media(MediaError::Remux(_))));
        assert_eq!(h.blobs.put_count(), 0);
        let partial = h.remuxer.outputs.lock().unwrap()[0].clone();
        assert!(!partial.exists());
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_record_untouched() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::failing(),
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Storage(_)));
        assert_eq!(h.blobs.put_count(), 1);
        assert_eq!(h.videos.updates.load(Ordering::SeqCst), 0);
        assert_eq!(h.videos.video(h.video.id).unwrap(), h.video);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_record_update_failure_after_storage() {
        let h = Harness::with_videos(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
            |store| store.fail_updates = true,
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Persistence(_)));
        // object is already stored; the record is not
        assert_eq!(h.blobs.objects.lock().unwrap().len(), 1);
        assert!(h.videos.video(h.video.id).unwrap().video_url.is_none());
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_record_lookup_failure_is_not_an_update_failure() {
        let h = Harness::with_videos(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
            |store| store.fail_gets = true,
        );
        let err = h
            .service
            .ingest_video(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Lookup(_)));
        assert_eq!(h.videos.updates.load(Ordering::SeqCst), 0);
        assert_eq!(h.prober.calls.load(Ordering::SeqCst), 0);
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_payload_error_mid_stream() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let req = UploadRequest {
            video_id: h.video.id,
            user_id: h.owner,
            content_type: Some("video/mp4".into()),
            payload: futures::stream::iter(vec![
                Ok(Bytes::from_static(MP4_BYTES)),
                Err(IngestError::PayloadTooLarge("limit exceeded".into())),
            ]),
        };
        let err = h.service.ingest_video(req).await.unwrap_err();
        assert!(matches!(err, IngestError::PayloadTooLarge(_)));
        assert!(h.staging_is_empty());
    }

    #[tokio::test]
    async fn test_thumbnail_upload() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let video = h
            .service
            .ingest_thumbnail(request(&h, "image/png", b"\x89PNG\r\n\x1a\nrest"))
            .await
            .unwrap();
        let url = video.thumbnail_url.unwrap();
        assert!(url.starts_with("https://cdn.example.com/thumbnails/"));
        assert!(url.ends_with(".png"));
        assert!(video.video_url.is_none());
        assert_eq!(h.prober.calls.load(Ordering::SeqCst), 0);
        assert!(stored_key(&h).starts_with("videos/thumbnails/"));
    }

    #[tokio::test]
    async fn test_thumbnail_rejects_video() {
        let h = Harness::new(
            FakeProber::with_video(1920, 1080),
            FakeRemuxer::copying(),
            FakeBlobStore::default(),
        );
        let err = h
            .service
            .ingest_thumbnail(request(&h, "video/mp4", MP4_BYTES))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedMediaType(_)));
        assert_eq!(h.videos.call_count(), 0);
    }

    #[test]
    fn test_accept_media_type() {
        assert_eq!(
            accept_media_type(Some("Video/MP4"), &VIDEO_MEDIA_TYPES).unwrap(),
            "video/mp4"
        );
        assert!(accept_media_type(None, &VIDEO_MEDIA_TYPES).is_err());
        assert!(accept_media_type(Some("image/jpg"), &THUMBNAIL_MEDIA_TYPES).is_err());
        assert!(accept_media_type(Some("image/jpeg"), &THUMBNAIL_MEDIA_TYPES).is_ok());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Received.to_string(), "received");
        assert_eq!(Stage::Recorded.to_string(), "recorded");
    }
}
