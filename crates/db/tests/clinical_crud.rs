//! Integration tests for the clinical repositories.
//!
//! Exercises the repository layer against a real database:
//! - Patient -> video -> events/notes hierarchy
//! - Ordering guarantees of the list queries
//! - Partial note updates and timestamp clearing
//! - Cascade delete from videos
//! - Unique constraint violations

use chrono::NaiveDate;
use sqlx::PgPool;
use stemsight_core::doctor::Specialization;
use stemsight_core::event_category::EventCategory;
use stemsight_core::review_status::ReviewStatus;
use stemsight_core::types::DbId;
use stemsight_db::models::doctor::{CreateDoctor, UpdateDoctor};
use stemsight_db::models::medical_history::CreateMedicalHistory;
use stemsight_db::models::note::{CreateNote, UpdateNote};
use stemsight_db::models::patient::CreatePatient;
use stemsight_db::models::patient_event::CreatePatientEvent;
use stemsight_db::models::video::CreateVideo;
use stemsight_db::repositories::{
    DoctorRepo, MedicalHistoryRepo, NoteRepo, PatientEventRepo, PatientRepo, VideoRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_patient(pool: &PgPool, first: &str) -> DbId {
    let input = CreatePatient {
        first_name: first.to_string(),
        middle_name: None,
        last_name: "Doe".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
        primary_phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
    };
    PatientRepo::create(pool, &input).await.unwrap().id
}

async fn seed_video(pool: &PgPool, patient_id: DbId, path: &str) -> DbId {
    let input = CreateVideo {
        patient_id,
        file_path: path.to_string(),
        description: Some("Ward round".to_string()),
        duration_seconds: Some(300.0),
    };
    VideoRepo::create(pool, &input, &format!("http://media/{path}"))
        .await
        .unwrap()
        .id
}

fn new_event(patient_id: DbId, video_id: DbId, category: EventCategory, at: f64) -> CreatePatientEvent {
    CreatePatientEvent {
        patient_id,
        video_id,
        event_type: category,
        timestamp_seconds: at,
        confidence: Some(80),
        duration_seconds: None,
        validation_status: None,
    }
}

fn new_note(patient_id: DbId, video_id: DbId, content: &str, at: Option<f64>) -> CreateNote {
    CreateNote {
        patient_id,
        video_id: Some(video_id),
        author: None,
        content: content.to_string(),
        timestamp_seconds: at,
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_events_listed_by_timestamp(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let video = seed_video(&pool, patient, "jane_20260301.mp4").await;

    for (category, at) in [
        (EventCategory::Tremor, 200.0),
        (EventCategory::Myoclonus, 125.0),
        (EventCategory::Versive, 10.0),
    ] {
        PatientEventRepo::create(&pool, &new_event(patient, video, category, at))
            .await
            .unwrap();
    }

    let events = PatientEventRepo::list_by_video(&pool, video).await.unwrap();
    let stamps: Vec<f64> = events.iter().map(|e| e.timestamp_seconds).collect();
    assert_eq!(stamps, vec![10.0, 125.0, 200.0]);
    assert!(events.iter().all(|e| e.validation_status == "pending"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_status_update(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let video = seed_video(&pool, patient, "jane_status.mp4").await;
    let event = PatientEventRepo::create(&pool, &new_event(patient, video, EventCategory::Tremor, 5.0))
        .await
        .unwrap();

    let updated = PatientEventRepo::update_status(&pool, event.id, ReviewStatus::Confirmed)
        .await
        .unwrap()
        .expect("event exists");
    assert_eq!(updated.validation_status, "confirmed");

    let missing = PatientEventRepo::update_status(&pool, DbId::new_v4(), ReviewStatus::Dismissed)
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_note_partial_update_keeps_timestamp(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let video = seed_video(&pool, patient, "jane_notes.mp4").await;
    let note = NoteRepo::create(&pool, None, "Dr. Grey", &new_note(patient, video, "  jerks  ", Some(42.0)))
        .await
        .unwrap();
    assert_eq!(note.content, "jerks");

    let edited = NoteRepo::update(
        &pool,
        note.id,
        &UpdateNote {
            content: Some("jerks, left arm".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(edited.content, "jerks, left arm");
    assert_eq!(edited.timestamp_seconds, Some(42.0));

    let cleared = NoteRepo::update(
        &pool,
        note.id,
        &UpdateNote {
            timestamp_seconds: Some(10.0),
            clear_timestamp: true,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.timestamp_seconds, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_note_delete_removes_only_target(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let video = seed_video(&pool, patient, "jane_delete.mp4").await;
    let mut ids = Vec::new();
    for content in ["first", "second", "third"] {
        let note = NoteRepo::create(&pool, None, "Dr. Grey", &new_note(patient, video, content, None))
            .await
            .unwrap();
        ids.push(note.id);
    }

    assert!(NoteRepo::delete(&pool, ids[1]).await.unwrap());
    assert!(!NoteRepo::delete(&pool, ids[1]).await.unwrap());

    let remaining: Vec<DbId> = NoteRepo::list_by_video(&pool, video)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.contains(&ids[0]));
    assert!(remaining.contains(&ids[2]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_note_timestamp_rejected_by_check(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let video = seed_video(&pool, patient, "jane_check.mp4").await;
    let result = NoteRepo::create(&pool, None, "Dr. Grey", &new_note(patient, video, "bad", Some(-1.0))).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_video_delete_cascades(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let video = seed_video(&pool, patient, "jane_cascade.mp4").await;
    PatientEventRepo::create(&pool, &new_event(patient, video, EventCategory::Fencer, 1.0))
        .await
        .unwrap();
    NoteRepo::create(&pool, None, "Dr. Grey", &new_note(patient, video, "note", None))
        .await
        .unwrap();

    assert!(VideoRepo::delete(&pool, video).await.unwrap());
    assert!(PatientEventRepo::list_by_video(&pool, video).await.unwrap().is_empty());
    assert!(NoteRepo::list_by_video(&pool, video).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_video_path_rejected(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    seed_video(&pool, patient, "dup.mp4").await;
    let input = CreateVideo {
        patient_id: patient,
        file_path: "dup.mp4".to_string(),
        description: None,
        duration_seconds: None,
    };
    let err = VideoRepo::create(&pool, &input, "http://media/dup.mp4")
        .await
        .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint().map(str::to_string));
    assert_eq!(constraint.as_deref(), Some("uq_videos_file_path"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recording_upsert_reuses_row(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let first = VideoRepo::upsert_recording(&pool, patient, "rec.mp4", "http://a/rec.mp4")
        .await
        .unwrap();
    let second = VideoRepo::upsert_recording(&pool, patient, "rec.mp4", "http://b/rec.mp4")
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.public_video_url, "http://b/rec.mp4");
    assert_eq!(VideoRepo::list_by_patient(&pool, patient).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Doctors and medical history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_doctor_patch_and_history_note(pool: PgPool) {
    let patient = seed_patient(&pool, "Jane").await;
    let doctor = DoctorRepo::create(
        &pool,
        &CreateDoctor {
            first_name: "Meredith".to_string(),
            middle_name: None,
            last_name: "Grey".to_string(),
            specialization: Specialization::Neurology,
            email: "grey@stemsight.org".to_string(),
            primary_phone: "555-0101".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(doctor.specialization, "Neurology");

    let patched = DoctorRepo::update(
        &pool,
        doctor.id,
        &UpdateDoctor {
            specialization: Some(Specialization::Radiology),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(patched.specialization, "Radiology");
    assert_eq!(patched.first_name, "Meredith");

    let history = MedicalHistoryRepo::create(
        &pool,
        &CreateMedicalHistory {
            patient_id: patient,
            doctor_id: doctor.id,
            diagnosis: "Focal epilepsy".to_string(),
            note: Some("Started levetiracetam".to_string()),
        },
    )
    .await
    .unwrap();

    let cleared = MedicalHistoryRepo::update_note(&pool, history.id, "")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.note, None);

    let listed = MedicalHistoryRepo::list(&pool, Some(patient)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(MedicalHistoryRepo::delete(&pool, history.id).await.unwrap());
}
