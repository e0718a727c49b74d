//! Medical history model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stemsight_core::types::{DbId, Timestamp};

/// A row from the `medical_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MedicalHistory {
    pub id: DbId,
    pub patient_id: DbId,
    pub doctor_id: DbId,
    pub diagnosis: String,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedicalHistory {
    pub patient_id: DbId,
    pub doctor_id: DbId,
    pub diagnosis: String,
    pub note: Option<String>,
}

/// DTO for updating a medical history record. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMedicalHistory {
    pub patient_id: Option<DbId>,
    pub doctor_id: Option<DbId>,
    pub diagnosis: Option<String>,
    pub note: Option<String>,
}
