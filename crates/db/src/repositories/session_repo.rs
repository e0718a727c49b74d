//! Refresh-token rotation over `user_sessions`.
//!
//! A refresh token is usable once: [`SessionRepo::consume`] revokes it in the
//! same statement that looks it up, and the caller then issues a successor
//! with [`SessionRepo::open`].

use sqlx::PgPool;
use stemsight_core::types::DbId;

use crate::models::session::{IssuedRefreshToken, UserSession};

const COLUMNS: &str =
    "id, user_id, refresh_token_hash, expires_at, is_revoked, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    /// Record a freshly issued refresh token.
    pub async fn open(
        pool: &PgPool,
        token: &IssuedRefreshToken,
    ) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token.user_id)
            .bind(&token.token_hash)
            .bind(token.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Spend a refresh token. Returns the owning user id, or `None` when the
    /// token is unknown, expired or already spent. Two concurrent calls with
    /// the same hash cannot both succeed.
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Revoke every live session of a user (logout, password change).
    pub async fn end_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete spent and expired rows. Returns how many were removed.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE is_revoked = true OR expires_at <= NOW()")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
