//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `stemsight_db`, run domain
//! validation from `stemsight_core`, and map errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod doctors;
pub mod medical_history;
pub mod notes;
pub mod patient_events;
pub mod patients;
pub mod videos;
