//! Repository for the `notes` table.

use sqlx::PgPool;
use stemsight_core::types::DbId;

use crate::models::note::{CreateNote, Note, UpdateNote};

/// Column list for notes queries.
const COLUMNS: &str = "id, patient_id, video_id, author, author_user_id, content, \
    timestamp_seconds, created_at, updated_at";

/// Provides CRUD operations for clinician notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Create a note, returning the created row.
    ///
    /// `author` is the resolved display name; `input.author` is ignored here
    /// so the caller decides the fallback.
    pub async fn create(
        pool: &PgPool,
        author_user_id: Option<DbId>,
        author: &str,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes
                (patient_id, video_id, author, author_user_id, content, timestamp_seconds)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(input.patient_id)
            .bind(input.video_id)
            .bind(author)
            .bind(author_user_id)
            .bind(input.content.trim())
            .bind(input.timestamp_seconds)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Notes attached to a video, newest first.
    pub async fn list_by_video(pool: &PgPool, video_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes WHERE video_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// All notes for a patient, newest first.
    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes WHERE patient_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    /// Partially update a note. `clear_timestamp` wins over a supplied
    /// timestamp.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                content = COALESCE($2, content),
                timestamp_seconds = CASE
                    WHEN $4 THEN NULL
                    ELSE COALESCE($3, timestamp_seconds)
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(input.content.as_deref().map(str::trim))
            .bind(input.timestamp_seconds)
            .bind(input.clear_timestamp)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
