//! Repository for the `password_resets` table.

use sqlx::PgPool;
use stemsight_core::types::DbId;

use crate::models::password_reset::{CreatePasswordReset, PasswordReset};

const COLUMNS: &str = "id, user_id, token_hash, expires_at, used_at, created_at";

pub struct PasswordResetRepo;

impl PasswordResetRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePasswordReset,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically mark an unused, unexpired token as used and return it.
    ///
    /// Returns `None` when the token is unknown, expired or already consumed,
    /// so a token can be redeemed at most once.
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "UPDATE password_resets SET used_at = NOW()
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Invalidate every outstanding token for a user.
    pub async fn invalidate_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_resets SET used_at = NOW() WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
