pub mod auth;
pub mod doctors;
pub mod health;
pub mod medical_history;
pub mod notes;
pub mod patient_events;
pub mod patients;
pub mod streaming;
pub mod videos;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                                     dashboard notifications (WebSocket)
///
/// /auth/login, /auth/refresh              public
/// /auth/request-password-reset            public
/// /auth/confirm-password-reset            public
/// /auth/logout, /auth/me                  bearer token
///
/// /patients, /patients/{id}, /patients/{id}/videos
/// /doctors, /doctors/{id}
/// /videos, /videos/{id}
/// /patient-events, /patient-events/video/{id}, /patient-events/patient/{id},
///   /patient-events/{id}/status
/// /notes, /notes/video/{id}, /notes/patient/{id}, /notes/{id}
/// /medical-history, /medical-history/{id}, /medical-history/{id}/note
///
/// /streaming/live/{patient_id}            camera (WebSocket)
/// /streaming/watch/{patient_id}           viewer (WebSocket)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/patients", patients::router())
        .nest("/doctors", doctors::router())
        .nest("/videos", videos::router())
        .nest("/patient-events", patient_events::router())
        .nest("/notes", notes::router())
        .nest("/medical-history", medical_history::router())
        .nest("/streaming", streaming::router())
}
