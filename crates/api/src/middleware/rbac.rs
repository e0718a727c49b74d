//! Role gates for roster and record administration.
//!
//! Clinicians review sessions and write notes; deleting videos or medical
//! history records and managing the doctor roster needs `admin`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stemsight_core::error::CoreError;
use stemsight_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated admin. Any other role gets 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role.as_str() {
            ROLE_ADMIN => Ok(Self(user)),
            other => {
                tracing::debug!(user_id = %user.user_id, role = other, "Admin route refused");
                Err(AppError::Core(CoreError::Forbidden(
                    "Admin role required".into(),
                )))
            }
        }
    }
}
