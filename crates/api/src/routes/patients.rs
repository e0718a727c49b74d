use axum::routing::get;
use axum::Router;

use crate::handlers::patients;
use crate::state::AppState;

/// Routes mounted at `/patients`.
///
/// ```text
/// GET /              -> list_patients (?limit, offset)
/// GET /{id}          -> get_patient
/// GET /{id}/videos   -> list_patient_videos
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(patients::list_patients))
        .route("/{id}", get(patients::get_patient))
        .route("/{id}/videos", get(patients::list_patient_videos))
}
