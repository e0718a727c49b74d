//! Automatically detected patient events.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stemsight_core::event_category::EventCategory;
use stemsight_core::review_status::ReviewStatus;
use stemsight_core::types::{DbId, Timestamp};

/// A row from the `patient_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PatientEvent {
    pub id: DbId,
    pub patient_id: DbId,
    pub video_id: DbId,
    pub event_type: String,
    pub timestamp_seconds: f64,
    pub confidence: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub validation_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a detection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientEvent {
    pub patient_id: DbId,
    pub video_id: DbId,
    pub event_type: EventCategory,
    pub timestamp_seconds: f64,
    pub confidence: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub validation_status: Option<ReviewStatus>,
}

/// Body of `PATCH /patient-events/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventStatus {
    pub validation_status: ReviewStatus,
}
