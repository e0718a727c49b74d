use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::streaming;

/// WebSocket routes mounted at `/streaming`.
///
/// ```text
/// GET /live/{patient_id}    -> broadcast_handler (camera, binary frames in)
/// GET /watch/{patient_id}   -> watch_handler (dashboard, binary frames out)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/live/{patient_id}", get(streaming::broadcast_handler))
        .route("/watch/{patient_id}", get(streaming::watch_handler))
}
