//! Repository for the `medical_history` table.

use sqlx::PgPool;
use stemsight_core::types::DbId;

use crate::models::medical_history::{
    CreateMedicalHistory, MedicalHistory, UpdateMedicalHistory,
};

const COLUMNS: &str = "id, patient_id, doctor_id, diagnosis, note, created_at, updated_at";

pub struct MedicalHistoryRepo;

impl MedicalHistoryRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateMedicalHistory,
    ) -> Result<MedicalHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO medical_history (patient_id, doctor_id, diagnosis, note)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(input.patient_id)
            .bind(input.doctor_id)
            .bind(&input.diagnosis)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MedicalHistory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medical_history WHERE id = $1");
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records, newest first, optionally restricted to one patient.
    pub async fn list(
        pool: &PgPool,
        patient_id: Option<DbId>,
    ) -> Result<Vec<MedicalHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medical_history
             WHERE ($1::uuid IS NULL OR patient_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedicalHistory,
    ) -> Result<Option<MedicalHistory>, sqlx::Error> {
        let query = format!(
            "UPDATE medical_history SET
                patient_id = COALESCE($2, patient_id),
                doctor_id = COALESCE($3, doctor_id),
                diagnosis = COALESCE($4, diagnosis),
                note = COALESCE($5, note)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(id)
            .bind(input.patient_id)
            .bind(input.doctor_id)
            .bind(&input.diagnosis)
            .bind(&input.note)
            .fetch_optional(pool)
            .await
    }

    /// Replace only the note. An empty string clears it.
    pub async fn update_note(
        pool: &PgPool,
        id: DbId,
        note: &str,
    ) -> Result<Option<MedicalHistory>, sqlx::Error> {
        let query = format!(
            "UPDATE medical_history SET note = NULLIF($2, '')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(id)
            .bind(note)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medical_history WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
