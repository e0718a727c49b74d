//! Refresh-token sessions. One row per issued refresh token.

use sqlx::FromRow;
use stemsight_core::types::{DbId, Timestamp};

/// A row from `user_sessions`.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A refresh token about to be handed to a client. Only its hash is stored.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
