//! Handlers for the patient roster.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use stemsight_core::error::CoreError;
use stemsight_core::types::DbId;
use stemsight_db::repositories::{PatientRepo, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /patients?limit=&offset=
pub async fn list_patients(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let patients = PatientRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: patients }))
}

/// GET /patients/{id}
pub async fn get_patient(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let patient = PatientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id,
        }))?;
    Ok(Json(DataResponse { data: patient }))
}

/// GET /patients/{id}/videos
///
/// Recorded sessions of one patient, newest first.
pub async fn list_patient_videos(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let videos = VideoRepo::list_by_patient(&state.pool, id).await?;
    Ok(Json(DataResponse { data: videos }))
}
