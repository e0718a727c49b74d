use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use stemsight_core::error::CoreError;
use stemsight_core::types::DbId;
use tokio::sync::{broadcast, RwLock};

/// Frames buffered per room before slow viewers start lagging.
const DEFAULT_ROOM_CAPACITY: usize = 256;

/// Fan-out point for one patient's live stream.
#[derive(Debug)]
pub struct StreamRoom {
    sender: broadcast::Sender<Bytes>,
    broadcaster_connected: AtomicBool,
}

impl StreamRoom {
    fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            broadcaster_connected: AtomicBool::new(false),
        }
    }

    /// Send a frame to every current viewer. Returns the number of viewers
    /// it was queued for.
    pub fn publish(&self, frame: Bytes) -> usize {
        self.sender.send(frame).unwrap_or(0)
    }

    pub fn viewer_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn is_live(&self) -> bool {
        self.broadcaster_connected.load(Ordering::Acquire)
    }
}

/// Exclusive right to broadcast into a room. Dropping it frees the slot.
#[derive(Debug)]
pub struct BroadcastLease {
    room: Arc<StreamRoom>,
}

impl BroadcastLease {
    pub fn room(&self) -> &StreamRoom {
        &self.room
    }
}

impl Drop for BroadcastLease {
    fn drop(&mut self) {
        self.room
            .broadcaster_connected
            .store(false, Ordering::Release);
    }
}

/// Registry of live-stream rooms keyed by patient id.
///
/// Rooms are created on first use by either side, so a viewer may connect
/// before the camera does and simply wait for frames.
pub struct StreamHub {
    rooms: RwLock<HashMap<DbId, Arc<StreamRoom>>>,
    capacity: usize,
}

impl StreamHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Claim the broadcaster slot for a patient.
    ///
    /// Fails with [`CoreError::Conflict`] while another broadcaster holds it.
    /// The claim happens under the registry lock, so a concurrent
    /// [`release`](Self::release) never removes the room being claimed.
    pub async fn open_broadcast(&self, patient_id: DbId) -> Result<BroadcastLease, CoreError> {
        let mut rooms = self.rooms.write().await;
        let room = self.room_entry(&mut rooms, patient_id);
        room.broadcaster_connected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                CoreError::Conflict(format!("Patient {patient_id} already has a live broadcaster"))
            })?;
        Ok(BroadcastLease { room })
    }

    /// Subscribe to a patient's frames, creating the room if needed.
    pub async fn subscribe(&self, patient_id: DbId) -> broadcast::Receiver<Bytes> {
        let mut rooms = self.rooms.write().await;
        self.room_entry(&mut rooms, patient_id).sender.subscribe()
    }

    fn room_entry(
        &self,
        rooms: &mut HashMap<DbId, Arc<StreamRoom>>,
        patient_id: DbId,
    ) -> Arc<StreamRoom> {
        Arc::clone(
            rooms
                .entry(patient_id)
                .or_insert_with(|| Arc::new(StreamRoom::new(self.capacity))),
        )
    }

    /// Drop the room once it has neither a broadcaster nor viewers.
    ///
    /// Callers must drop their lease or receiver before calling this.
    pub async fn release(&self, patient_id: DbId) {
        let mut rooms = self.rooms.write().await;
        let idle = rooms
            .get(&patient_id)
            .is_some_and(|room| !room.is_live() && room.viewer_count() == 0);
        if idle {
            rooms.remove(&patient_id);
            tracing::debug!(patient_id = %patient_id, "Stream room released");
        }
    }

    /// Patients that currently have a broadcaster connected.
    pub async fn active_rooms(&self) -> Vec<DbId> {
        let mut live: Vec<DbId> = self
            .rooms
            .read()
            .await
            .iter()
            .filter(|(_, room)| room.is_live())
            .map(|(id, _)| *id)
            .collect();
        live.sort();
        live
    }

    pub async fn viewer_count(&self, patient_id: DbId) -> usize {
        self.rooms
            .read()
            .await
            .get(&patient_id)
            .map_or(0, |room| room.viewer_count())
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CAPACITY)
    }
}
