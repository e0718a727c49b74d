//! Repository for the `patient_events` table.

use sqlx::PgPool;
use stemsight_core::review_status::ReviewStatus;
use stemsight_core::types::DbId;

use crate::models::patient_event::{CreatePatientEvent, PatientEvent};

const COLUMNS: &str = "id, patient_id, video_id, event_type, timestamp_seconds, confidence, \
                        duration_seconds, validation_status, created_at, updated_at";

pub struct PatientEventRepo;

impl PatientEventRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePatientEvent,
    ) -> Result<PatientEvent, sqlx::Error> {
        let status = input.validation_status.unwrap_or_default();
        let query = format!(
            "INSERT INTO patient_events
                (patient_id, video_id, event_type, timestamp_seconds, confidence,
                 duration_seconds, validation_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PatientEvent>(&query)
            .bind(input.patient_id)
            .bind(input.video_id)
            .bind(input.event_type.as_str())
            .bind(input.timestamp_seconds)
            .bind(input.confidence)
            .bind(input.duration_seconds)
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Events of one video, by timestamp ascending. Ties keep insertion order.
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Vec<PatientEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM patient_events
             WHERE video_id = $1
             ORDER BY timestamp_seconds ASC, created_at ASC"
        );
        sqlx::query_as::<_, PatientEvent>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<PatientEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM patient_events
             WHERE patient_id = $1
             ORDER BY timestamp_seconds ASC, created_at ASC"
        );
        sqlx::query_as::<_, PatientEvent>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ReviewStatus,
    ) -> Result<Option<PatientEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE patient_events SET validation_status = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PatientEvent>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
