use axum::routing::get;
use axum::Router;

use crate::handlers::doctors;
use crate::state::AppState;

/// Routes mounted at `/doctors`.
///
/// ```text
/// GET   /       -> list_doctors
/// POST  /       -> create_doctor (admin)
/// GET   /{id}   -> get_doctor
/// PATCH /{id}   -> update_doctor (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(doctors::list_doctors).post(doctors::create_doctor))
        .route(
            "/{id}",
            get(doctors::get_doctor).patch(doctors::update_doctor),
        )
}
