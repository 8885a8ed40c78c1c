pub mod aspect;
pub mod asset_key;
pub mod blob_store;
pub mod ingest_service;
pub mod media;
pub mod scratch;
pub mod video_store;
