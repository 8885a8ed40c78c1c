//! src/services/blob_store.rs
//!
//! BlobStore: the object-storage collaborator. The upload pipeline only ever
//! calls `put`; `open` backs the `/assets` route. `LocalBlobStore` keeps
//! payloads beneath `base_path/{bucket}/{key}` and is the default backend.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use md5::Context;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("object `{key}` not found in bucket `{bucket}`")]
    NotFound { bucket: String, key: String },
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
    #[error("invalid bucket name `{0}`")]
    InvalidBucket(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type BlobResult<T> = Result<T, BlobError>;

/// What the store reports back after a successful `put`.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub key: String,
    pub size_bytes: u64,
    pub etag: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `bucket/key`, replacing any existing object.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> BlobResult<StoredBlob>;

    /// Open a stored object for streaming reads.
    async fn open(&self, bucket: &str, key: &str) -> BlobResult<File>;

    /// Readiness check.
    async fn ping(&self) -> BlobResult<()>;
}

const MAX_OBJECT_KEY_LEN: usize = 1024;

#[derive(Clone)]
pub struct LocalBlobStore {
    /// Base directory on disk where object payloads are stored.
    pub base_path: PathBuf,
}

impl LocalBlobStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Rejects keys that could escape the bucket directory.
    fn ensure_key_safe(key: &str) -> BlobResult<()> {
        let invalid = || Err(BlobError::InvalidKey(key.to_string()));
        if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
            return invalid();
        }
        if key.starts_with('/') || key.split('/').any(|seg| seg == ".." || seg.is_empty()) {
            return invalid();
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return invalid();
        }
        Ok(())
    }

    fn ensure_bucket_safe(bucket: &str) -> BlobResult<()> {
        if bucket.is_empty()
            || !bucket
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
            || bucket.starts_with('.')
        {
            return Err(BlobError::InvalidBucket(bucket.to_string()));
        }
        Ok(())
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.base_path.join(bucket);
        path.extend(key.split('/'));
        path
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    /// Stream-upload an object to disk.
    ///
    /// - Writes bytes incrementally to a temporary file next to the target.
    /// - Computes MD5/etag and size while streaming.
    /// - fsyncs, then renames into the final location.
    ///
    /// The temporary file is removed on every error path.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        mut body: ByteStream,
        content_type: &str,
    ) -> BlobResult<StoredBlob> {
        Self::ensure_bucket_safe(bucket)?;
        Self::ensure_key_safe(key)?;

        let file_path = self.object_path(bucket, key);
        let parent = file_path.parent().map(Path::to_path_buf).ok_or_else(|| {
            BlobError::Io(io::Error::new(
                ErrorKind::Other,
                "object path missing parent directory",
            ))
        })?;
        fs::create_dir_all(&parent).await?;
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let mut size_bytes: u64 = 0;
        let mut digest = Context::new();
        while let Some(chunk_res) = body.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(BlobError::Io(err));
                }
            };
            size_bytes += chunk.len() as u64;
            digest.consume(&chunk);
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(BlobError::Io(err));
            }
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(BlobError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(BlobError::Io(err));
        }
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(BlobError::Io(err));
        }

        let etag = format!("{:x}", digest.compute());
        debug!(
            bucket,
            key,
            content_type,
            size_bytes,
            etag = %etag,
            "stored object"
        );

        Ok(StoredBlob {
            key: key.to_string(),
            size_bytes,
            etag,
        })
    }

    async fn open(&self, bucket: &str, key: &str) -> BlobResult<File> {
        Self::ensure_bucket_safe(bucket)?;
        Self::ensure_key_safe(key)?;
        let file_path = self.object_path(bucket, key);
        File::open(&file_path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                BlobError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                BlobError::Io(err)
            }
        })
    }

    async fn ping(&self) -> BlobResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        let meta = fs::metadata(&self.base_path).await?;
        if !meta.is_dir() {
            return Err(BlobError::Io(io::Error::new(
                ErrorKind::Other,
                "blob store root is not a directory",
            )));
        }
        Ok(())
    }
}

/// Wrap an in-memory payload as a single-chunk byte stream.
pub fn once_stream(bytes: Bytes) -> ByteStream {
    futures::stream::once(async move { Ok(bytes) }).boxed()
}
