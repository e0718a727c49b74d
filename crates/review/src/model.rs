//! Wire types exchanged with the STEMSight API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stemsight_core::event_category::{self, EventCategory};
use stemsight_core::review_status::ReviewStatus;
use stemsight_core::types::DbId;

// ---------------------------------------------------------------------------
// Clinical records
// ---------------------------------------------------------------------------

/// An automatically detected clinical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: DbId,
    pub patient_id: DbId,
    pub video_id: DbId,
    /// Raw category name. Unknown names are kept so newer detectors do not
    /// break older viewers.
    #[serde(rename = "event_type")]
    pub category: String,
    pub timestamp_seconds: f64,
    pub confidence: Option<i32>,
    pub duration_seconds: Option<f64>,
    #[serde(rename = "validation_status", default)]
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn category(&self) -> Option<EventCategory> {
        self.category.parse().ok()
    }

    /// Timeline heading; falls back to the raw category name.
    pub fn title(&self) -> String {
        self.category()
            .map(|c| c.title().to_string())
            .unwrap_or_else(|| self.category.clone())
    }

    pub fn color(&self) -> &'static str {
        event_category::color_for(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: DbId,
    pub patient_id: DbId,
    pub video_id: Option<DbId>,
    pub author: String,
    pub content: String,
    /// `None` means the note is not pinned to a moment of the video.
    pub timestamp_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: DbId,
    pub patient_id: DbId,
    pub file_path: String,
    pub public_video_url: String,
    pub description: Option<String>,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: DbId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob: NaiveDate,
    pub primary_phone: String,
    pub address: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        stemsight_core::patient::full_name(
            &self.first_name,
            self.middle_name.as_deref(),
            &self.last_name,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DbId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
    pub primary_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub id: DbId,
    pub patient_id: DbId,
    pub doctor_id: DbId,
    pub diagnosis: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    pub patient_id: DbId,
    pub video_id: Option<DbId>,
    pub content: String,
    pub timestamp_seconds: Option<f64>,
}

/// Partial note update. `None` fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_seconds: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub clear_timestamp: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVideo {
    pub patient_id: DbId,
    pub file_path: String,
    pub description: Option<String>,
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub patient_id: DbId,
    pub video_id: DbId,
    pub event_type: EventCategory,
    pub timestamp_seconds: f64,
    pub confidence: Option<i32>,
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMedicalHistory {
    pub patient_id: DbId,
    pub doctor_id: DbId,
    pub diagnosis: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MedicalHistoryChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
