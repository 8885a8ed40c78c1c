//! Wrappers around the external media tools.
//!
//! - `Prober` lists the streams of a container (`ffprobe`)
//! - `Remuxer` rewrites a container for fast-start playback (`ffmpeg`)
//!
//! Both are traits so the upload pipeline can run against canned results in
//! tests without the tools installed.

use async_trait::async_trait;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("probe failed: {0}")]
    Probe(String),
    /// The path is for logs only; it never reaches a response body.
    #[error("no video stream found")]
    NoVideoStream(PathBuf),
    #[error("invalid video dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("remux failed: {0}")]
    Remux(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Other,
}

/// One stream as reported by the prober.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub kind: StreamKind,
    pub width: u32,
    pub height: u32,
}

impl StreamDescriptor {
    #[cfg(test)]
    pub fn video(width: u32, height: u32) -> Self {
        Self {
            kind: StreamKind::Video,
            width,
            height,
        }
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// List every stream of the container at `path`, in container order.
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>, MediaError>;
}

#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Copy all streams of `source` into `output` with the index moved to the
    /// front. `source` is left in place.
    async fn remux(&self, source: &Path, output: &Path) -> Result<(), MediaError>;
}

/// First video stream of a probe result; later video tracks are ignored.
pub fn first_video_stream<'a>(
    streams: &'a [StreamDescriptor],
    path: &Path,
) -> Result<&'a StreamDescriptor, MediaError> {
    let stream = streams.iter().find(|s| s.kind == StreamKind::Video);
    if stream.is_none() {
        warn!(path = %path.display(), streams = streams.len(), "no video stream in probe result");
    }
    stream.ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Vec<StreamDescriptor>, MediaError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::Probe(format!("malformed ffprobe output: {}", e)))?;

    Ok(output
        .streams
        .into_iter()
        .map(|s| StreamDescriptor {
            kind: match s.codec_type.as_deref() {
                Some("video") => StreamKind::Video,
                Some("audio") => StreamKind::Audio,
                _ => StreamKind::Other,
            },
            width: s.width.unwrap_or(0),
            height: s.height.unwrap_or(0),
        })
        .collect())
}

/// `ffprobe` subprocess prober.
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl Prober for FfprobeProber {
    #[tracing::instrument(skip(self), fields(tool = "ffprobe"))]
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>, MediaError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MediaError::Probe(format!("failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(status = %output.status, "ffprobe failed: {}", stderr.trim());
            return Err(MediaError::Probe(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let streams = parse_probe_output(&output.stdout)?;
        debug!(count = streams.len(), "probed streams");
        Ok(streams)
    }
}

/// `ffmpeg` stream-copy remuxer producing fast-start MP4.
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(tool = "ffmpeg"))]
    async fn remux(&self, source: &Path, output: &Path) -> Result<(), MediaError> {
        // -y: the output path is reserved (created empty) by the caller.
        let result = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-y", "-i"])
            .arg(source)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MediaError::Remux(format!("failed to run ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!(status = %result.status, "ffmpeg failed: {}", stderr.trim());
            return Err(MediaError::Remux(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
