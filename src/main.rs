use anyhow::Result;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{fs, io::ErrorKind, path::Path, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;

use config::Command;
use routes::routes::UploadLimits;
use services::{
    blob_store::LocalBlobStore,
    ingest_service::{IngestService, IngestSettings},
    media::{FfmpegRemuxer, FfprobeProber},
    video_store::{SqliteVideoStore, run_migrations},
};

const ISSUED_TOKEN_TTL_HOURS: i64 = 24;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + command ---
    let (cfg, command) = config::AppConfig::from_env_and_args()?;

    if let Command::IssueToken(user_id) = command {
        let token = auth::issue_jwt(
            user_id,
            &cfg.jwt_secret,
            chrono::Duration::hours(ISSUED_TOKEN_TTL_HOURS),
        )?;
        println!("{}", token);
        return Ok(());
    }

    tracing::info!("Starting video-ingest with config: {:?}", cfg);

    // --- Ensure local directories exist ---
    for dir in [&cfg.staging_dir, &cfg.assets_dir] {
        if !Path::new(dir).exists() {
            fs::create_dir_all(dir)?;
            tracing::info!("Created directory at {}", dir);
        }
    }

    // --- Initialize SQLite connection ---
    let db_url = &cfg.database_url;
    tracing::debug!("Connecting using raw URL => {}", db_url);

    let db_path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }

    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(SqliteConnectOptions::from_str(db_url)?.create_if_missing(true))
        .await?;

    // --- Handle migration mode ---
    if command == Command::Migrate {
        run_migrations(&db).await?;
        tracing::info!("Database migration complete.");
        return Ok(()); // exit after migration
    }

    // --- Initialize core service ---
    let ingest = IngestService::new(
        Arc::new(FfprobeProber::new(cfg.ffprobe_path.clone())),
        Arc::new(FfmpegRemuxer::new(cfg.ffmpeg_path.clone())),
        Arc::new(LocalBlobStore::new(cfg.assets_dir.clone())),
        Arc::new(SqliteVideoStore::new(db)),
        IngestSettings {
            staging_dir: cfg.staging_dir.clone().into(),
            bucket: cfg.bucket.clone(),
            distribution_base: cfg.distribution_base.clone(),
        },
    );
    ingest.ensure_staging_dir().await?;

    // --- Build router ---
    let limits = UploadLimits {
        max_video_bytes: cfg.max_video_bytes,
        max_thumbnail_bytes: cfg.max_thumbnail_bytes,
    };
    let app: Router = routes::routes::routes(limits)
        .with_state(state::AppState::new(ingest, cfg.jwt_secret.clone()));

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
