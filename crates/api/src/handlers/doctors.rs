//! Handlers for the doctor directory.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stemsight_core::error::CoreError;
use stemsight_core::patient::validate_name_part;
use stemsight_core::types::DbId;
use stemsight_core::validation::{validate_email, validate_required};
use stemsight_db::models::doctor::{CreateDoctor, UpdateDoctor};
use stemsight_db::repositories::DoctorRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /doctors
pub async fn list_doctors(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let doctors = DoctorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: doctors }))
}

/// GET /doctors/{id}
pub async fn get_doctor(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let doctor = DoctorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Doctor", id }))?;
    Ok(Json(DataResponse { data: doctor }))
}

/// POST /doctors (admin)
pub async fn create_doctor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDoctor>,
) -> AppResult<impl IntoResponse> {
    validate_name_part("First name", &input.first_name).map_err(AppError::BadRequest)?;
    validate_name_part("Last name", &input.last_name).map_err(AppError::BadRequest)?;
    validate_email(input.email.trim()).map_err(AppError::BadRequest)?;
    validate_required("Primary phone", &input.primary_phone).map_err(AppError::BadRequest)?;

    let doctor = DoctorRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = %admin.user_id, doctor_id = %doctor.id, "Doctor created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: doctor })))
}

/// PATCH /doctors/{id} (admin)
pub async fn update_doctor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDoctor>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref first) = input.first_name {
        validate_name_part("First name", first).map_err(AppError::BadRequest)?;
    }
    if let Some(ref last) = input.last_name {
        validate_name_part("Last name", last).map_err(AppError::BadRequest)?;
    }

    let doctor = DoctorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Doctor", id }))?;

    tracing::info!(user_id = %admin.user_id, doctor_id = %id, "Doctor updated");
    Ok(Json(DataResponse { data: doctor }))
}
