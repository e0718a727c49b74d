use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /       -> list_videos
/// POST   /       -> create_video
/// DELETE /{id}   -> delete_video (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/{id}", delete(videos::delete_video))
}
