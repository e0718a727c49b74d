//! Clinician notes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stemsight_core::types::{DbId, Timestamp};

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub patient_id: DbId,
    pub video_id: Option<DbId>,
    pub author: String,
    pub author_user_id: Option<DbId>,
    pub content: String,
    pub timestamp_seconds: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a note.
///
/// `author` defaults to the authenticated user's display name.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub patient_id: DbId,
    pub video_id: Option<DbId>,
    pub author: Option<String>,
    pub content: String,
    pub timestamp_seconds: Option<f64>,
}

/// Partial note update.
///
/// A missing `timestamp_seconds` keeps the stored value; set
/// `clear_timestamp` to unlink the note from the video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub content: Option<String>,
    pub timestamp_seconds: Option<f64>,
    #[serde(default)]
    pub clear_timestamp: bool,
}
