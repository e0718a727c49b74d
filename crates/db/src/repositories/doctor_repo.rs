//! Repository for the `doctors` table.

use sqlx::PgPool;
use stemsight_core::types::DbId;

use crate::models::doctor::{CreateDoctor, Doctor, UpdateDoctor};

const COLUMNS: &str = "id, first_name, middle_name, last_name, specialization, email, \
                        primary_phone, created_at, updated_at";

pub struct DoctorRepo;

impl DoctorRepo {
    pub async fn create(pool: &PgPool, input: &CreateDoctor) -> Result<Doctor, sqlx::Error> {
        let query = format!(
            "INSERT INTO doctors
                (first_name, middle_name, last_name, specialization, email, primary_phone)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(&input.last_name)
            .bind(input.specialization.as_str())
            .bind(input.email.trim())
            .bind(&input.primary_phone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors WHERE id = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors ORDER BY last_name ASC, first_name ASC");
        sqlx::query_as::<_, Doctor>(&query).fetch_all(pool).await
    }

    /// Update a doctor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDoctor,
    ) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!(
            "UPDATE doctors SET
                first_name = COALESCE($2, first_name),
                middle_name = COALESCE($3, middle_name),
                last_name = COALESCE($4, last_name),
                specialization = COALESCE($5, specialization),
                primary_phone = COALESCE($6, primary_phone)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(&input.last_name)
            .bind(input.specialization.map(|s| s.as_str()))
            .bind(&input.primary_phone)
            .fetch_optional(pool)
            .await
    }
}
