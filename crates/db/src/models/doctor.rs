//! Doctor model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stemsight_core::doctor::Specialization;
use stemsight_core::types::{DbId, Timestamp};

/// A row from the `doctors` table.
///
/// `specialization` holds the display string of a [`Specialization`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Doctor {
    pub id: DbId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
    pub primary_phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctor {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub specialization: Specialization,
    pub email: String,
    pub primary_phone: String,
}

/// DTO for patching a doctor. Email is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctor {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub specialization: Option<Specialization>,
    pub primary_phone: Option<String>,
}
