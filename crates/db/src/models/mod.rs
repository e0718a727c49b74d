//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod doctor;
pub mod medical_history;
pub mod note;
pub mod password_reset;
pub mod patient;
pub mod patient_event;
pub mod session;
pub mod user;
pub mod video;
