use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// POST   /               -> create_note
/// GET    /video/{id}     -> list_by_video
/// GET    /patient/{id}   -> list_by_patient
/// PUT    /{id}           -> update_note
/// DELETE /{id}           -> delete_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(notes::create_note))
        .route("/video/{id}", get(notes::list_by_video))
        .route("/patient/{id}", get(notes::list_by_patient))
        .route("/{id}", put(notes::update_note).delete(notes::delete_note))
}
