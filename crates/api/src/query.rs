//! Shared query parameter types for API handlers.

use serde::Deserialize;
use stemsight_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Optional `?patient_id=` filter.
#[derive(Debug, Deserialize)]
pub struct PatientFilter {
    pub patient_id: Option<DbId>,
}
