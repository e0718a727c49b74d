//! Handlers for the `/auth` resource (login, refresh, logout, password reset).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use stemsight_core::error::CoreError;
use stemsight_core::validation::{
    validate_email, validate_password_confirmation, validate_password_strength, validate_required,
};
use stemsight_db::models::password_reset::CreatePasswordReset;
use stemsight_db::models::session::IssuedRefreshToken;
use stemsight_db::models::user::{User, UserResponse};
use stemsight_db::repositories::{PasswordResetRepo, SessionRepo, UserRepo};
use stemsight_events::delivery::email::{password_reset_link, PasswordResetEmail};

use crate::auth::jwt::{generate_access_token, generate_opaque_token, hash_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Reply to every reset request, whether or not the email has an account.
const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that email, a reset link has been sent";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    validate_required("Email", &input.email).map_err(AppError::BadRequest)?;
    validate_required("Password", &input.password).map_err(AppError::BadRequest)?;

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = %user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    let response = create_auth_response(&state, &user).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new token pair. The presented token is
/// spent atomically, so replaying it fails with 401.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_token(&input.refresh_token);

    let user_id = SessionRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    tracing::debug!(user_id = %user.id, "Refresh token rotated");
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::end_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The account behind the current access token.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/v1/auth/request-password-reset
///
/// Always answers 200. When the email matches an active account a one-time
/// token is stored (hashed) and the link is emailed, or logged when SMTP is
/// not configured.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    validate_email(input.email.trim()).map_err(AppError::BadRequest)?;

    let response = Json(DataResponse {
        data: MessageResponse {
            message: RESET_REQUESTED_MESSAGE,
        },
    });

    let Some(user) = UserRepo::find_by_email(&state.pool, input.email.trim()).await? else {
        tracing::debug!("Password reset requested for unknown email");
        return Ok(response);
    };
    if !user.is_active {
        return Ok(response);
    }

    PasswordResetRepo::invalidate_for_user(&state.pool, user.id).await?;

    let (token, token_hash) = generate_opaque_token();
    let expiry_mins = state.config.password_reset.expiry_mins;
    PasswordResetRepo::create(
        &state.pool,
        &CreatePasswordReset {
            user_id: user.id,
            token_hash,
            expires_at: Utc::now() + chrono::Duration::minutes(expiry_mins),
        },
    )
    .await?;

    let link = password_reset_link(&state.config.password_reset.url, &token);
    match &state.email {
        Some(email) => {
            let message = PasswordResetEmail {
                link: &link,
                expiry_mins,
            };
            if let Err(e) = email.send_password_reset(&user.email, &message).await {
                tracing::error!(user_id = %user.id, error = %e, "Failed to send password reset email");
            }
        }
        None => {
            tracing::warn!(user_id = %user.id, link = %link, "SMTP not configured, password reset link logged");
        }
    }

    tracing::info!(user_id = %user.id, "Password reset requested");
    Ok(response)
}

/// POST /api/v1/auth/confirm-password-reset
///
/// Redeem a reset token. The token works once; every session of the user is
/// revoked afterwards.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetConfirm>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    validate_required("Token", &input.token).map_err(AppError::BadRequest)?;
    validate_password_strength(&input.new_password).map_err(AppError::BadRequest)?;
    validate_password_confirmation(&input.new_password, &input.confirm_password)
        .map_err(AppError::BadRequest)?;

    let reset = PasswordResetRepo::consume(&state.pool, &hash_token(input.token.trim()))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".into()))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, reset.user_id, &password_hash).await?;
    SessionRepo::end_all_for_user(&state.pool, reset.user_id).await?;

    tracing::info!(user_id = %reset.user_id, "Password reset completed");
    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "Password has been reset",
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, token_hash) = generate_opaque_token();
    SessionRepo::open(
        &state.pool,
        &IssuedRefreshToken {
            user_id: user.id,
            token_hash,
            expires_at: state.config.jwt.refresh_expires_at(),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_expires_in(),
        user: UserResponse::from(user),
    })
}
