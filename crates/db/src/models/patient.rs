//! Patient roster entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stemsight_core::types::{DbId, Timestamp};

/// A row from the `patients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patient {
    pub id: DbId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob: NaiveDate,
    pub primary_phone: String,
    pub address: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Patient {
    pub fn full_name(&self) -> String {
        stemsight_core::patient::full_name(
            &self.first_name,
            self.middle_name.as_deref(),
            &self.last_name,
        )
    }
}

/// DTO for registering a patient.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatient {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob: NaiveDate,
    pub primary_phone: String,
    pub address: String,
}
