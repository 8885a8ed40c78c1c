use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, str::FromStr};
use uuid::Uuid;

const ENV_PREFIX: &str = "VIDEO_INGEST_";

const DEFAULT_MAX_VIDEO_BYTES: usize = 1 << 30; // 1 GiB
const DEFAULT_MAX_THUMBNAIL_BYTES: usize = 10 << 20; // 10 MiB

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Request-scoped upload and remux files live here.
    pub staging_dir: String,
    /// Root of the local object store.
    pub assets_dir: String,
    pub bucket: String,
    pub distribution_base: String,
    pub jwt_secret: String,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub max_video_bytes: usize,
    pub max_thumbnail_bytes: usize,
}

/// One-shot operator actions that run instead of the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Serve,
    Migrate,
    IssueToken(Uuid),
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Video upload ingest service")]
pub struct Args {
    /// Host to bind to (overrides VIDEO_INGEST_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides VIDEO_INGEST_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides VIDEO_INGEST_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory for temporary upload files (overrides VIDEO_INGEST_STAGING_DIR)
    #[arg(long)]
    pub staging_dir: Option<String>,

    /// Directory where stored objects live (overrides VIDEO_INGEST_ASSETS_DIR)
    #[arg(long)]
    pub assets_dir: Option<String>,

    /// Object-store bucket (overrides VIDEO_INGEST_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Public base URL of stored objects (overrides VIDEO_INGEST_DISTRIBUTION_BASE)
    #[arg(long)]
    pub distribution_base: Option<String>,

    /// Path to the ffprobe binary (overrides VIDEO_INGEST_FFPROBE_PATH)
    #[arg(long)]
    pub ffprobe_path: Option<String>,

    /// Path to the ffmpeg binary (overrides VIDEO_INGEST_FFMPEG_PATH)
    #[arg(long)]
    pub ffmpeg_path: Option<String>,

    /// Maximum video upload size in bytes (overrides VIDEO_INGEST_MAX_VIDEO_BYTES)
    #[arg(long)]
    pub max_video_bytes: Option<usize>,

    /// Maximum thumbnail upload size in bytes (overrides VIDEO_INGEST_MAX_THUMBNAIL_BYTES)
    #[arg(long)]
    pub max_thumbnail_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,

    /// Print an access token for this user id and exit
    #[arg(long, value_name = "USER_ID", conflicts_with = "migrate")]
    pub issue_token: Option<Uuid>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the command to run.
    pub fn from_env_and_args() -> Result<(Self, Command)> {
        Self::merge(Args::parse(), |name| env::var(name))
    }

    fn merge(
        args: Args,
        lookup: impl Fn(&str) -> Result<String, env::VarError>,
    ) -> Result<(Self, Command)> {
        let var = |name: &str| -> Result<Option<String>> {
            let key = format!("{}{}", ENV_PREFIX, name);
            match lookup(&key) {
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err).with_context(|| format!("reading {}", key)),
            }
        };
        let parsed = |name: &str| -> Result<Option<usize>> { parse_var(name, var(name)?) };

        let port = match var("PORT")? {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing {}PORT value `{}`", ENV_PREFIX, value))?,
            None => 8091,
        };

        let jwt_secret = match var("JWT_SECRET")? {
            Some(secret) if !secret.is_empty() => secret,
            _ => bail!("{}JWT_SECRET must be set", ENV_PREFIX),
        };

        // --- Merge ---
        let cfg = Self {
            host: args
                .host
                .or(var("HOST")?)
                .unwrap_or_else(|| "0.0.0.0".into()),
            port: args.port.unwrap_or(port),
            database_url: args
                .database_url
                .or(var("DATABASE_URL")?)
                .unwrap_or_else(|| "sqlite://./data/meta/videos.db".into()),
            staging_dir: args
                .staging_dir
                .or(var("STAGING_DIR")?)
                .unwrap_or_else(|| "./data/staging".into()),
            assets_dir: args
                .assets_dir
                .or(var("ASSETS_DIR")?)
                .unwrap_or_else(|| "./data/assets".into()),
            bucket: args
                .bucket
                .or(var("BUCKET")?)
                .unwrap_or_else(|| "videos".into()),
            distribution_base: args
                .distribution_base
                .or(var("DISTRIBUTION_BASE")?)
                .unwrap_or_else(|| "http://localhost:8091/assets".into()),
            jwt_secret,
            ffprobe_path: args
                .ffprobe_path
                .or(var("FFPROBE_PATH")?)
                .unwrap_or_else(|| "ffprobe".into()),
            ffmpeg_path: args
                .ffmpeg_path
                .or(var("FFMPEG_PATH")?)
                .unwrap_or_else(|| "ffmpeg".into()),
            max_video_bytes: args
                .max_video_bytes
                .or(parsed("MAX_VIDEO_BYTES")?)
                .unwrap_or(DEFAULT_MAX_VIDEO_BYTES),
            max_thumbnail_bytes: args
                .max_thumbnail_bytes
                .or(parsed("MAX_THUMBNAIL_BYTES")?)
                .unwrap_or(DEFAULT_MAX_THUMBNAIL_BYTES),
        };

        let command = if args.migrate {
            Command::Migrate
        } else if let Some(user_id) = args.issue_token {
            Command::IssueToken(user_id)
        } else {
            Command::Serve
        };

        Ok((cfg, command))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|v| {
            v.parse::<T>()
                .with_context(|| format!("parsing {}{} value `{}`", ENV_PREFIX, name, v))
        })
        .transpose()
}

// Keep the secret out of startup logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("staging_dir", &self.staging_dir)
            .field("assets_dir", &self.assets_dir)
            .field("bucket", &self.bucket)
            .field("distribution_base", &self.distribution_base)
            .field("jwt_secret", &"<redacted>")
            .field("ffprobe_path", &self.ffprobe_path)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("max_video_bytes", &self.max_video_bytes)
            .field("max_thumbnail_bytes", &self.max_thumbnail_bytes)
            .finish()
    }
}
