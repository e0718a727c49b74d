//! Handlers for clinician notes.
//!
//! Notes belong to a patient and may be pinned to a moment of one of the
//! patient's videos. Timestamps are checked against the video duration when
//! it is known.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stemsight_core::error::CoreError;
use stemsight_core::notes::{validate_note_content, validate_note_timestamp};
use stemsight_core::types::DbId;
use stemsight_db::models::note::{CreateNote, UpdateNote};
use stemsight_db::repositories::{NoteRepo, PatientRepo, UserRepo, VideoRepo};
use stemsight_events::{event_types, PlatformEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /notes/video/{id}
///
/// Newest first.
pub async fn list_by_video(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let notes = NoteRepo::list_by_video(&state.pool, video_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// GET /notes/patient/{id}
pub async fn list_by_patient(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let notes = NoteRepo::list_by_patient(&state.pool, patient_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /notes
///
/// `author` falls back to the caller's display name when omitted or blank.
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<impl IntoResponse> {
    validate_note_content(&input.content).map_err(AppError::BadRequest)?;

    PatientRepo::find_by_id(&state.pool, input.patient_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id: input.patient_id,
        }))?;

    let duration = match input.video_id {
        Some(video_id) => {
            let video = VideoRepo::find_by_id(&state.pool, video_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Video",
                    id: video_id,
                }))?;
            if video.patient_id != input.patient_id {
                return Err(AppError::BadRequest(
                    "Video does not belong to this patient".into(),
                ));
            }
            video.duration_seconds
        }
        None => None,
    };
    validate_note_timestamp(input.timestamp_seconds, duration).map_err(AppError::BadRequest)?;

    let author = match input.author.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .map(|u| u.display_name)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?,
    };

    let note = NoteRepo::create(&state.pool, Some(auth.user_id), &author, &input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        note_id = %note.id,
        patient_id = %note.patient_id,
        "Note created"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::NOTE_CREATED)
            .for_patient(note.patient_id)
            .with_entity("note", note.id)
            .by(auth.user_id)
            .with_payload(serde_json::json!({ "video_id": note.video_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// PUT /notes/{id}
///
/// Partial update: absent fields keep their value, `clear_timestamp`
/// unlinks the note from the video.
pub async fn update_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNote>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref content) = input.content {
        validate_note_content(content).map_err(AppError::BadRequest)?;
    }

    let existing = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    if input.timestamp_seconds.is_some() && !input.clear_timestamp {
        let duration = match existing.video_id {
            Some(video_id) => VideoRepo::find_by_id(&state.pool, video_id)
                .await?
                .and_then(|v| v.duration_seconds),
            None => None,
        };
        validate_note_timestamp(input.timestamp_seconds, duration)
            .map_err(AppError::BadRequest)?;
    }

    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    tracing::info!(user_id = %auth.user_id, note_id = %id, "Note updated");
    state.event_bus.publish(
        PlatformEvent::new(event_types::NOTE_UPDATED)
            .for_patient(note.patient_id)
            .with_entity("note", id)
            .by(auth.user_id)
            .with_payload(serde_json::json!({ "video_id": note.video_id })),
    );

    Ok(Json(DataResponse { data: note }))
}

/// DELETE /notes/{id}
pub async fn delete_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    if !NoteRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Note", id }));
    }

    tracing::info!(user_id = %auth.user_id, note_id = %id, "Note deleted");
    state.event_bus.publish(
        PlatformEvent::new(event_types::NOTE_DELETED)
            .for_patient(note.patient_id)
            .with_entity("note", id)
            .by(auth.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
