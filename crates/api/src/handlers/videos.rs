//! Handlers for recorded session videos.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stemsight_core::error::CoreError;
use stemsight_core::timestamp::validate_offset;
use stemsight_core::types::DbId;
use stemsight_core::validation::validate_required;
use stemsight_db::models::video::CreateVideo;
use stemsight_db::repositories::VideoRepo;
use stemsight_events::{event_types, PlatformEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /videos
pub async fn list_videos(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let videos = VideoRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: videos }))
}

/// POST /videos
///
/// Register an already stored file. The public URL is derived from
/// `MEDIA_PUBLIC_BASE_URL`.
pub async fn create_video(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateVideo>,
) -> AppResult<impl IntoResponse> {
    validate_required("File path", &input.file_path).map_err(AppError::BadRequest)?;
    if let Some(duration) = input.duration_seconds {
        validate_offset(duration, None)
            .map_err(|e| AppError::BadRequest(format!("Invalid duration: {e}")))?;
    }

    let url = state.config.media_url(input.file_path.trim());
    let video = VideoRepo::create(&state.pool, &input, &url).await?;

    tracing::info!(user_id = %auth.user_id, video_id = %video.id, patient_id = %video.patient_id, "Video created");
    state.event_bus.publish(
        PlatformEvent::new(event_types::VIDEO_CREATED)
            .for_patient(video.patient_id)
            .with_entity("video", video.id)
            .by(auth.user_id)
            .with_payload(serde_json::json!({ "public_video_url": video.public_video_url })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// DELETE /videos/{id} (admin)
///
/// Events and notes attached to the video are removed with it.
pub async fn delete_video(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Video", id }))?;
    if !VideoRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Video", id }));
    }

    tracing::info!(user_id = %admin.user_id, video_id = %id, "Video deleted");
    state.event_bus.publish(
        PlatformEvent::new(event_types::VIDEO_DELETED)
            .for_patient(video.patient_id)
            .with_entity("video", id)
            .by(admin.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
