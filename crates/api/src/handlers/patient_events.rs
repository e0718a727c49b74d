//! Handlers for automatically detected patient events.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stemsight_core::error::CoreError;
use stemsight_core::timestamp::validate_offset;
use stemsight_core::types::DbId;
use stemsight_db::models::patient_event::{CreatePatientEvent, UpdateEventStatus};
use stemsight_db::repositories::{PatientEventRepo, VideoRepo};
use stemsight_events::{event_types, PlatformEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Confidence scores are percentages.
const MAX_CONFIDENCE: i32 = 100;

/// GET /patient-events/video/{id}
///
/// Ordered by timestamp ascending.
pub async fn list_by_video(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let events = PatientEventRepo::list_by_video(&state.pool, video_id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /patient-events/patient/{id}
pub async fn list_by_patient(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let events = PatientEventRepo::list_by_patient(&state.pool, patient_id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /patient-events
///
/// Record a detection. The timestamp must fall inside the video when the
/// video's duration is known.
pub async fn create_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePatientEvent>,
) -> AppResult<impl IntoResponse> {
    let video = VideoRepo::find_by_id(&state.pool, input.video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: input.video_id,
        }))?;
    if video.patient_id != input.patient_id {
        return Err(AppError::BadRequest(
            "Video does not belong to this patient".into(),
        ));
    }

    validate_offset(input.timestamp_seconds, video.duration_seconds)
        .map_err(AppError::BadRequest)?;
    if let Some(duration) = input.duration_seconds {
        validate_offset(duration, None)
            .map_err(|e| AppError::BadRequest(format!("Invalid duration: {e}")))?;
    }
    if let Some(confidence) = input.confidence {
        if !(0..=MAX_CONFIDENCE).contains(&confidence) {
            return Err(AppError::BadRequest(format!(
                "Confidence must be between 0 and {MAX_CONFIDENCE}"
            )));
        }
    }

    let event = PatientEventRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        video_id = %event.video_id,
        event_type = %event.event_type,
        "Patient event recorded"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::PATIENT_EVENT_DETECTED)
            .for_patient(event.patient_id)
            .with_entity("patient_event", event.id)
            .by(auth.user_id)
            .with_payload(serde_json::json!({
                "video_id": event.video_id,
                "event_type": event.event_type,
                "timestamp_seconds": event.timestamp_seconds,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PATCH /patient-events/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventStatus>,
) -> AppResult<impl IntoResponse> {
    let event = PatientEventRepo::update_status(&state.pool, id, input.validation_status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PatientEvent",
            id,
        }))?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %id,
        status = %input.validation_status,
        "Patient event reviewed"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::PATIENT_EVENT_REVIEWED)
            .for_patient(event.patient_id)
            .with_entity("patient_event", id)
            .by(auth.user_id)
            .with_payload(serde_json::json!({ "validation_status": event.validation_status })),
    );

    Ok(Json(DataResponse { data: event }))
}
