//! Password reset token model. Only the SHA-256 hash of the token is stored.

use sqlx::FromRow;
use stemsight_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

pub struct CreatePasswordReset {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
