//! Recorded session videos.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stemsight_core::types::{DbId, Timestamp};

/// A row from the `videos` table. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub patient_id: DbId,
    pub file_path: String,
    pub public_video_url: String,
    pub description: Option<String>,
    pub duration_seconds: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for registering a stored video file.
///
/// The public URL is derived from the configured media base URL, so it is
/// not part of the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub patient_id: DbId,
    pub file_path: String,
    pub description: Option<String>,
    pub duration_seconds: Option<f64>,
}
