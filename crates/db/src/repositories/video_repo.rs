//! Repository for the `videos` table.

use sqlx::PgPool;
use stemsight_core::types::DbId;

use crate::models::video::{CreateVideo, Video};

const COLUMNS: &str = "id, patient_id, file_path, public_video_url, description, \
                        duration_seconds, created_at";

pub struct VideoRepo;

impl VideoRepo {
    /// Register a stored video file, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVideo,
        public_video_url: &str,
    ) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (patient_id, file_path, public_video_url, description, duration_seconds)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.patient_id)
            .bind(&input.file_path)
            .bind(public_video_url)
            .bind(&input.description)
            .bind(input.duration_seconds)
            .fetch_one(pool)
            .await
    }

    /// Register a live-stream recording. A recording for the same file is
    /// kept as a single row, so reconnecting broadcasters on the same day
    /// reuse the existing entry.
    pub async fn upsert_recording(
        pool: &PgPool,
        patient_id: DbId,
        file_path: &str,
        public_video_url: &str,
    ) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (patient_id, file_path, public_video_url, description)
             VALUES ($1, $2, $3, 'Live session recording')
             ON CONFLICT ON CONSTRAINT uq_videos_file_path
             DO UPDATE SET public_video_url = EXCLUDED.public_video_url
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(patient_id)
            .bind(file_path)
            .bind(public_video_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos ORDER BY created_at DESC");
        sqlx::query_as::<_, Video>(&query).fetch_all(pool).await
    }

    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos WHERE patient_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a video. Its events and notes cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
