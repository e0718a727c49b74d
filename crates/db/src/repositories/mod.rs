//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod doctor_repo;
pub mod medical_history_repo;
pub mod note_repo;
pub mod password_reset_repo;
pub mod patient_event_repo;
pub mod patient_repo;
pub mod session_repo;
pub mod user_repo;
pub mod video_repo;

pub use doctor_repo::DoctorRepo;
pub use medical_history_repo::MedicalHistoryRepo;
pub use note_repo::NoteRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use patient_event_repo::PatientEventRepo;
pub use patient_repo::PatientRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
