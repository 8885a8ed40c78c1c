//! Core data models.
//!
//! Records map to database tables via `sqlx::FromRow` and serialize as the
//! JSON response bodies of the upload endpoints.

pub mod video;
