pub mod doctor;
pub mod error;
pub mod event_category;
pub mod medical_history;
pub mod notes;
pub mod pagination;
pub mod patient;
pub mod review_status;
pub mod roles;
pub mod timestamp;
pub mod types;
pub mod validation;
