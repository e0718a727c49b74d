//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, UPGRADE};
use axum::http::request::Parts;
use stemsight_core::error::CoreError;
use stemsight_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT access token.
///
/// The token is read from `Authorization: Bearer <token>`. WebSocket upgrade
/// requests may instead pass it as `?token=<token>`, since browsers cannot
/// set headers on a WebSocket handshake.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// `"admin"` or `"clinician"`.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(value) => {
                let header = value.to_str().map_err(|_| unauthorized("Invalid Authorization header"))?;
                header
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| {
                        unauthorized("Invalid Authorization format. Expected: Bearer <token>")
                    })?
                    .to_string()
            }
            None if is_websocket_upgrade(parts) => query_token(parts)
                .ok_or_else(|| unauthorized("Missing access token"))?,
            None => return Err(unauthorized("Missing Authorization header")),
        };

        let claims = validate_token(&token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

fn is_websocket_upgrade(parts: &Parts) -> bool {
    parts
        .headers
        .get(UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

/// Pull `token` out of the query string. Access tokens are URL-safe, so no
/// percent-decoding is needed.
fn query_token(parts: &Parts) -> Option<String> {
    parts
        .uri
        .query()?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "token")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
