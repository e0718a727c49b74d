use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::medical_history;
use crate::state::AppState;

/// Routes mounted at `/medical-history`.
///
/// ```text
/// GET    /             -> list_records (?patient_id)
/// POST   /             -> create_record
/// GET    /{id}         -> get_record
/// PUT    /{id}         -> update_record
/// DELETE /{id}         -> delete_record (admin)
/// PATCH  /{id}/note    -> update_record_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(medical_history::list_records).post(medical_history::create_record),
        )
        .route(
            "/{id}",
            get(medical_history::get_record)
                .put(medical_history::update_record)
                .delete(medical_history::delete_record),
        )
        .route("/{id}/note", patch(medical_history::update_record_note))
}
