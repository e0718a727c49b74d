//! Detection timeline.
//!
//! Entries are ordered by video offset. Each carries a local review status
//! that the reviewer can move freely between pending, confirmed and
//! dismissed. Pushing that status to the backend is optional; a failed push
//! is logged and the local status stands.

use async_trait::async_trait;
use stemsight_core::review_status::{ReviewAction, ReviewStatus};
use stemsight_core::types::DbId;

use crate::error::ClientError;
use crate::model::Event;

/// Persists an event's review status.
#[async_trait]
pub trait EventStatusStore: Send + Sync {
    async fn update_event_status(
        &self,
        event_id: DbId,
        status: ReviewStatus,
    ) -> Result<Event, ClientError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub event: Event,
    pub status: ReviewStatus,
}

impl TimelineEntry {
    pub fn id(&self) -> DbId {
        self.event.id
    }

    pub fn timestamp(&self) -> f64 {
        self.event.timestamp_seconds
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Build a timeline, sorted by timestamp ascending. Events sharing a
    /// timestamp keep their input order.
    pub fn new(events: Vec<Event>) -> Self {
        let mut entries: Vec<TimelineEntry> = events
            .into_iter()
            .map(|event| TimelineEntry {
                status: event.status,
                event,
            })
            .collect();
        entries.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, event_id: DbId) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.id() == event_id)
    }

    pub fn status(&self, event_id: DbId) -> Option<ReviewStatus> {
        self.get(event_id).map(|e| e.status)
    }

    /// Seek target for an entry.
    pub fn jump(&self, event_id: DbId) -> Option<f64> {
        self.get(event_id).map(TimelineEntry::timestamp)
    }

    pub fn confirm(&mut self, event_id: DbId) -> Option<ReviewStatus> {
        self.apply(event_id, ReviewAction::Confirm)
    }

    pub fn dismiss(&mut self, event_id: DbId) -> Option<ReviewStatus> {
        self.apply(event_id, ReviewAction::Dismiss)
    }

    /// Return a reviewed entry to pending.
    pub fn edit_status(&mut self, event_id: DbId) -> Option<ReviewStatus> {
        self.apply(event_id, ReviewAction::EditStatus)
    }

    /// Apply `action` locally. Returns the new status, or `None` if the
    /// event is not on this timeline.
    pub fn apply(&mut self, event_id: DbId, action: ReviewAction) -> Option<ReviewStatus> {
        let entry = self.entries.iter_mut().find(|e| e.event.id == event_id)?;
        entry.status = entry.status.apply(action);
        Some(entry.status)
    }

    /// Apply `action` locally and push the result through `store`, if any.
    pub async fn review(
        &mut self,
        event_id: DbId,
        action: ReviewAction,
        store: Option<&dyn EventStatusStore>,
    ) -> Option<ReviewStatus> {
        let status = self.apply(event_id, action)?;

        if let Some(store) = store {
            if let Err(e) = store.update_event_status(event_id, status).await {
                tracing::error!(
                    event_id = %event_id,
                    status = %status,
                    error = %e,
                    "Failed to persist event review status",
                );
            }
        }

        Some(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(id: u128, timestamp: f64) -> Event {
        Event {
            id: DbId::from_u128(id),
            patient_id: DbId::nil(),
            video_id: DbId::nil(),
            category: "tremor".into(),
            timestamp_seconds: timestamp,
            confidence: Some(70),
            duration_seconds: None,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn entries_sorted_by_timestamp_stable() {
        let timeline = Timeline::new(vec![event(1, 30.0), event(2, 5.0), event(3, 30.0)]);
        let ids: Vec<u128> = timeline.entries().iter().map(|e| e.id().as_u128()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn edit_status_returns_to_pending() {
        let id = DbId::from_u128(1);
        let mut timeline = Timeline::new(vec![event(1, 10.0)]);

        assert_eq!(timeline.confirm(id), Some(ReviewStatus::Confirmed));
        assert_eq!(timeline.edit_status(id), Some(ReviewStatus::Pending));
        assert_eq!(timeline.dismiss(id), Some(ReviewStatus::Dismissed));
        assert_eq!(timeline.edit_status(id), Some(ReviewStatus::Pending));
    }

    #[test]
    fn unknown_event_is_ignored() {
        let mut timeline = Timeline::new(vec![event(1, 10.0)]);
        assert_eq!(timeline.confirm(DbId::from_u128(9)), None);
        assert_eq!(timeline.status(DbId::from_u128(1)), Some(ReviewStatus::Pending));
    }

    struct FailingStore;

    #[async_trait]
    impl EventStatusStore for FailingStore {
        async fn update_event_status(
            &self,
            _event_id: DbId,
            _status: ReviewStatus,
        ) -> Result<Event, ClientError> {
            Err(ClientError::Validation("offline".into()))
        }
    }

    #[tokio::test]
    async fn failed_push_keeps_local_status() {
        let id = DbId::from_u128(1);
        let mut timeline = Timeline::new(vec![event(1, 10.0)]);

        let status = timeline
            .review(id, ReviewAction::Confirm, Some(&FailingStore))
            .await;

        assert_eq!(status, Some(ReviewStatus::Confirmed));
        assert_eq!(timeline.status(id), Some(ReviewStatus::Confirmed));
    }
}
