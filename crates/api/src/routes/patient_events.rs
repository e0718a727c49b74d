use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::patient_events;
use crate::state::AppState;

/// Routes mounted at `/patient-events`.
///
/// ```text
/// POST  /                   -> create_event
/// GET   /video/{id}         -> list_by_video
/// GET   /patient/{id}       -> list_by_patient
/// PATCH /{id}/status        -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(patient_events::create_event))
        .route("/video/{id}", get(patient_events::list_by_video))
        .route("/patient/{id}", get(patient_events::list_by_patient))
        .route("/{id}/status", patch(patient_events::update_status))
}
