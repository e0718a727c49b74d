//! Handlers for medical history records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stemsight_core::error::CoreError;
use stemsight_core::medical_history::{validate_diagnosis, validate_history_note};
use stemsight_core::types::DbId;
use stemsight_db::models::medical_history::{CreateMedicalHistory, UpdateMedicalHistory};
use stemsight_db::repositories::MedicalHistoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PatientFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PATCH /medical-history/{id}/note`. An empty note clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateHistoryNote {
    pub note: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MedicalHistory",
        id,
    })
}

/// GET /medical-history?patient_id=
pub async fn list_records(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<PatientFilter>,
) -> AppResult<impl IntoResponse> {
    let records = MedicalHistoryRepo::list(&state.pool, filter.patient_id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /medical-history/{id}
pub async fn get_record(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = MedicalHistoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /medical-history
pub async fn create_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMedicalHistory>,
) -> AppResult<impl IntoResponse> {
    validate_diagnosis(&input.diagnosis).map_err(AppError::BadRequest)?;
    if let Some(ref note) = input.note {
        validate_history_note(note).map_err(AppError::BadRequest)?;
    }

    let record = MedicalHistoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        record_id = %record.id,
        patient_id = %record.patient_id,
        "Medical history record created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// PUT /medical-history/{id}
pub async fn update_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedicalHistory>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref diagnosis) = input.diagnosis {
        validate_diagnosis(diagnosis).map_err(AppError::BadRequest)?;
    }
    if let Some(ref note) = input.note {
        validate_history_note(note).map_err(AppError::BadRequest)?;
    }

    let record = MedicalHistoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = %auth.user_id, record_id = %id, "Medical history record updated");
    Ok(Json(DataResponse { data: record }))
}

/// PATCH /medical-history/{id}/note
pub async fn update_record_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHistoryNote>,
) -> AppResult<impl IntoResponse> {
    validate_history_note(&input.note).map_err(AppError::BadRequest)?;

    let record = MedicalHistoryRepo::update_note(&state.pool, id, input.note.trim())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = %auth.user_id, record_id = %id, "Medical history note updated");
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /medical-history/{id} (admin)
pub async fn delete_record(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MedicalHistoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = %admin.user_id, record_id = %id, "Medical history record deleted");
    Ok(StatusCode::NO_CONTENT)
}
