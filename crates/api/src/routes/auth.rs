//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login                    -> login
/// POST /refresh                  -> refresh
/// POST /logout                   -> logout (requires auth)
/// GET  /me                       -> me (requires auth)
/// POST /request-password-reset   -> request_password_reset
/// POST /confirm-password-reset   -> confirm_password_reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/request-password-reset", post(auth::request_password_reset))
        .route("/confirm-password-reset", post(auth::confirm_password_reset))
}
