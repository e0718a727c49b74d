//! Clinical event bus.
//!
//! Handlers publish a [`PlatformEvent`] after every mutation a dashboard
//! should hear about (new detection, review decision, note change, stream
//! start/stop). The bus is a `tokio::sync::broadcast` channel shared as
//! `Arc<EventBus>`; the API's notification forwarder is its main subscriber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stemsight_core::types::DbId;
use tokio::sync::broadcast;

/// Dot-separated event names.
pub mod event_types {
    pub const NOTE_CREATED: &str = "note.created";
    pub const NOTE_UPDATED: &str = "note.updated";
    pub const NOTE_DELETED: &str = "note.deleted";
    pub const PATIENT_EVENT_DETECTED: &str = "patient_event.detected";
    pub const PATIENT_EVENT_REVIEWED: &str = "patient_event.reviewed";
    pub const VIDEO_CREATED: &str = "video.created";
    pub const VIDEO_DELETED: &str = "video.deleted";
    pub const STREAM_STARTED: &str = "stream.started";
    pub const STREAM_ENDED: &str = "stream.ended";
}

/// The record an event is about, e.g. `{ "kind": "note", "id": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub id: DbId,
}

/// Something that happened to a patient's clinical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// One of [`event_types`].
    pub event_type: String,
    /// Patient the event concerns. Events without one reach every dashboard.
    pub patient_id: Option<DbId>,
    pub entity: Option<EntityRef>,
    /// Clinician whose request caused the event.
    pub actor_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            patient_id: None,
            entity: None,
            actor_id: None,
            payload: serde_json::json!({}),
            occurred_at: Utc::now(),
        }
    }

    pub fn for_patient(mut self, patient_id: DbId) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn with_entity(mut self, kind: impl Into<String>, id: DbId) -> Self {
        self.entity = Some(EntityRef {
            kind: kind.into(),
            id,
        });
        self
    }

    pub fn by(mut self, user_id: DbId) -> Self {
        self.actor_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Events buffered per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 1024;

/// ```rust
/// use stemsight_events::bus::{event_types, EventBus, PlatformEvent};
/// use stemsight_core::types::DbId;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new(event_types::NOTE_CREATED).for_patient(DbId::new_v4()));
/// assert!(rx.try_recv().is_ok());
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fan `event` out to current subscribers and return how many got it.
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        let event_type = event.event_type.clone();
        let patient_id = event.patient_id;
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::debug!(
            event_type = %event_type,
            patient_id = ?patient_id,
            delivered,
            "Published clinical event",
        );
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
