//! Review-model behaviour against in-memory collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use stemsight_core::review_status::{ReviewAction, ReviewStatus};
use stemsight_core::types::DbId;
use stemsight_review::error::ClientError;
use stemsight_review::gallery::{sort_sessions, Detection, GallerySort, SessionSummary};
use stemsight_review::model::{Event, NewNote, Note, NoteChanges, Video};
use stemsight_review::notes::{NotePanel, NoteStore};
use stemsight_review::session::SessionReview;
use stemsight_review::timeline::{EventStatusStore, Timeline};
use stemsight_review::video_surface::{Player, VideoSurface};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockPlayer {
    seeks: Vec<f64>,
    position: f64,
    duration: Option<f64>,
}

impl Player for MockPlayer {
    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}

fn id(n: u128) -> DbId {
    DbId::from_u128(n)
}

fn note(n: u128, content: &str) -> Note {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
    Note {
        id: id(n),
        patient_id: id(100),
        video_id: Some(id(200)),
        author: "Dr. Osler".into(),
        content: content.into(),
        timestamp_seconds: None,
        created_at: at,
        updated_at: at,
    }
}

fn event(n: u128, category: &str, timestamp: f64, confidence: i32) -> Event {
    Event {
        id: id(n),
        patient_id: id(100),
        video_id: id(200),
        category: category.into(),
        timestamp_seconds: timestamp,
        confidence: Some(confidence),
        duration_seconds: None,
        status: ReviewStatus::Pending,
        created_at: Utc::now(),
    }
}

fn video(duration: f64) -> Video {
    Video {
        id: id(200),
        patient_id: id(100),
        file_path: "100_20260301.mp4".into(),
        public_video_url: "http://localhost:8000/media/100_20260301.mp4".into(),
        description: Some("Station 3".into()),
        duration_seconds: Some(duration),
        created_at: Utc::now(),
    }
}

/// Counts calls and answers from a fixed note list.
#[derive(Default)]
struct MemoryNoteStore {
    calls: AtomicUsize,
    next_id: Mutex<u128>,
    fail: bool,
}

impl MemoryNoteStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Status {
                status: 500,
                code: "INTERNAL_ERROR".into(),
                message: "database unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create_note(&self, input: &NewNote) -> Result<Note, ClientError> {
        self.check()?;
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let mut created = note(1000 + *next, &input.content);
        created.timestamp_seconds = input.timestamp_seconds;
        Ok(created)
    }

    async fn update_note(&self, note_id: DbId, changes: &NoteChanges) -> Result<Note, ClientError> {
        self.check()?;
        let mut updated = note(note_id.as_u128(), changes.content.as_deref().unwrap_or("kept"));
        updated.timestamp_seconds = changes.timestamp_seconds;
        Ok(updated)
    }

    async fn delete_note(&self, _note_id: DbId) -> Result<(), ClientError> {
        self.check()
    }
}

#[derive(Default)]
struct MemoryStatusStore {
    pushed: Mutex<Vec<(DbId, ReviewStatus)>>,
}

#[async_trait]
impl EventStatusStore for MemoryStatusStore {
    async fn update_event_status(
        &self,
        event_id: DbId,
        status: ReviewStatus,
    ) -> Result<Event, ClientError> {
        self.pushed.lock().unwrap().push((event_id, status));
        let mut stored = event(event_id.as_u128(), "myoclonus", 0.0, 0);
        stored.status = status;
        Ok(stored)
    }
}

// ---------------------------------------------------------------------------
// Video surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_seek_to_same_target_moves_playback_twice() {
    let mut surface = VideoSurface::new(MockPlayer::default());

    surface.seek_to(42.0).await;
    surface.seek_to(42.0).await;

    assert_eq!(surface.player().seeks, vec![41.5, 42.0, 41.5, 42.0]);
}

// ---------------------------------------------------------------------------
// Note panel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_draft_is_not_persisted() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(id(100), Some(id(200)), vec![note(1, "existing")]);
    panel.draft = "   \n\t ".into();

    let created = panel.create(&store).await.unwrap();

    assert!(created.is_none());
    assert_eq!(store.calls(), 0);
    assert_eq!(panel.notes().len(), 1);
}

#[tokio::test]
async fn created_note_is_prepended_with_captured_time() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(id(100), Some(id(200)), vec![note(1, "older")]);
    panel.set_current_time(61.0);
    panel.capture_timestamp();
    panel.draft = "  Left arm jerks  ".into();

    panel.create(&store).await.unwrap();

    let first = &panel.notes()[0];
    assert_eq!(first.content, "Left arm jerks");
    assert_eq!(first.timestamp_seconds, Some(61.0));
    assert_eq!(panel.notes()[1].id, id(1));
    assert!(panel.draft.is_empty());
    assert_eq!(panel.captured_timestamp(), None);
}

#[tokio::test]
async fn blank_edit_keeps_original_content() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(id(100), Some(id(200)), vec![note(1, "original")]);

    panel.begin_edit(id(1));
    panel.set_edit_content("    ");
    let saved = panel.save_edit(&store).await.unwrap();

    assert!(saved.is_none());
    assert_eq!(store.calls(), 0);
    assert_eq!(panel.get(id(1)).unwrap().content, "original");
}

#[tokio::test]
async fn saved_edit_replaces_entry_in_place() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(
        id(100),
        Some(id(200)),
        vec![note(1, "a"), note(2, "b"), note(3, "c")],
    );

    panel.begin_edit(id(2));
    panel.set_edit_content("b revised");
    panel.save_edit(&store).await.unwrap();

    let contents: Vec<&str> = panel.notes().iter().map(|n| n.content.as_str()).collect();
    assert_eq!(contents, vec!["a", "b revised", "c"]);
    assert!(panel.editing().is_none());
}

#[tokio::test]
async fn update_timestamp_binds_current_time() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(id(100), Some(id(200)), vec![note(1, "a")]);
    panel.set_current_time(88.5);

    panel.update_timestamp(&store, id(1)).await.unwrap();

    assert_eq!(panel.get(id(1)).unwrap().timestamp_seconds, Some(88.5));
}

#[tokio::test]
async fn delete_removes_exactly_one_and_keeps_order() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(
        id(100),
        Some(id(200)),
        vec![note(1, "a"), note(2, "b"), note(3, "c"), note(4, "d")],
    );

    panel.request_delete(id(2));
    let deleted = panel.confirm_delete(&store).await.unwrap();

    assert_eq!(deleted, Some(id(2)));
    let ids: Vec<DbId> = panel.notes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![id(1), id(3), id(4)]);
    assert_eq!(panel.pending_delete(), None);
}

#[tokio::test]
async fn cancelled_delete_makes_no_call() {
    let store = MemoryNoteStore::default();
    let mut panel = NotePanel::new(id(100), Some(id(200)), vec![note(1, "a")]);

    panel.request_delete(id(1));
    panel.cancel_delete();

    assert_eq!(panel.confirm_delete(&store).await.unwrap(), None);
    assert_eq!(store.calls(), 0);
    assert_eq!(panel.notes().len(), 1);
}

#[tokio::test]
async fn failed_persistence_leaves_list_unchanged() {
    let store = MemoryNoteStore::failing();
    let mut panel = NotePanel::new(id(100), Some(id(200)), vec![note(1, "a"), note(2, "b")]);
    let before = panel.notes().to_vec();

    panel.draft = "new".into();
    assert_matches!(panel.create(&store).await, Err(ClientError::Status { status: 500, .. }));

    panel.begin_edit(id(1));
    panel.set_edit_content("changed");
    assert_matches!(panel.save_edit(&store).await, Err(ClientError::Status { .. }));
    assert!(panel.editing().is_some());

    panel.request_delete(id(2));
    assert_matches!(panel.confirm_delete(&store).await, Err(ClientError::Status { .. }));

    assert_eq!(panel.notes(), before.as_slice());
    assert_eq!(panel.draft, "new");
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[test]
fn status_cycle_only_uses_three_values() {
    let mut timeline = Timeline::new(vec![event(1, "tremor", 5.0, 60)]);
    let actions = [
        ReviewAction::Confirm,
        ReviewAction::EditStatus,
        ReviewAction::Dismiss,
        ReviewAction::Confirm,
        ReviewAction::EditStatus,
    ];
    let mut seen = Vec::new();

    for action in actions {
        seen.push(timeline.apply(id(1), action).unwrap());
    }

    assert_eq!(
        seen,
        vec![
            ReviewStatus::Confirmed,
            ReviewStatus::Pending,
            ReviewStatus::Dismissed,
            ReviewStatus::Confirmed,
            ReviewStatus::Pending,
        ]
    );
}

#[tokio::test]
async fn review_pushes_status_to_store() {
    let store = MemoryStatusStore::default();
    let mut timeline = Timeline::new(vec![event(1, "tremor", 5.0, 60)]);

    timeline
        .review(id(1), ReviewAction::Dismiss, Some(&store))
        .await;

    assert_eq!(
        *store.pushed.lock().unwrap(),
        vec![(id(1), ReviewStatus::Dismissed)]
    );
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

fn summary(n: u128, detections: usize, hours_ago: i64) -> SessionSummary {
    SessionSummary {
        patient_id: id(100),
        patient_name: "Grace Hopper".into(),
        station: None,
        started_at: Utc::now() - Duration::hours(hours_ago),
        video_id: id(n),
        detections: (0..detections)
            .map(|_| Detection {
                category: "tremor".into(),
                color: "yellow",
            })
            .collect(),
    }
}

#[test]
fn most_detections_sorts_descending_and_stable() {
    let mut sessions = vec![
        summary(1, 2, 5),
        summary(2, 5, 4),
        summary(3, 2, 3),
        summary(4, 0, 2),
        summary(5, 5, 1),
    ];

    sort_sessions(&mut sessions, GallerySort::MostDetections);

    let order: Vec<u128> = sessions.iter().map(|s| s.video_id.as_u128()).collect();
    assert_eq!(order, vec![2, 5, 1, 3, 4]);
}

#[test]
fn latest_and_oldest_sort_by_start_time() {
    let mut sessions = vec![summary(1, 0, 5), summary(2, 0, 1), summary(3, 0, 3)];

    sort_sessions(&mut sessions, GallerySort::Latest);
    let latest: Vec<u128> = sessions.iter().map(|s| s.video_id.as_u128()).collect();
    assert_eq!(latest, vec![2, 3, 1]);

    sort_sessions(&mut sessions, GallerySort::Oldest);
    let oldest: Vec<u128> = sessions.iter().map(|s| s.video_id.as_u128()).collect();
    assert_eq!(oldest, vec![1, 3, 2]);
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn jump_to_event_then_confirm_only_that_event() {
    let player = MockPlayer {
        duration: Some(300.0),
        ..Default::default()
    };
    let events = vec![
        event(1, "tremor", 40.0, 55),
        event(2, "myoclonus", 125.0, 80),
        event(3, "versive", 210.0, 70),
    ];
    let mut session = SessionReview::new(video(300.0), events, vec![note(1, "a")], player);

    let reported = session.jump_to_event(id(2)).await.unwrap();
    assert!((reported - 125.0).abs() <= 1.0);
    assert!((session.notes.current_time() - 125.0).abs() <= 1.0);

    let status = session
        .review_event(id(2), ReviewAction::Confirm, None)
        .await;
    assert_eq!(status, Some(ReviewStatus::Confirmed));

    assert_eq!(session.timeline.status(id(1)), Some(ReviewStatus::Pending));
    assert_eq!(session.timeline.status(id(2)), Some(ReviewStatus::Confirmed));
    assert_eq!(session.timeline.status(id(3)), Some(ReviewStatus::Pending));
}

#[tokio::test]
async fn time_updates_feed_note_capture() {
    let mut session = SessionReview::new(video(300.0), vec![], vec![], MockPlayer::default());

    session.on_time_update(17.25);
    assert_eq!(session.notes.capture_timestamp(), 17.25);
    assert_eq!(session.current_time(), 17.25);
}

#[tokio::test]
async fn jump_to_unpinned_note_does_not_seek() {
    let mut session =
        SessionReview::new(video(300.0), vec![], vec![note(1, "a")], MockPlayer::default());

    assert_eq!(session.jump_to_note(id(1)).await, None);
    assert!(session.surface.player().seeks.is_empty());
}
