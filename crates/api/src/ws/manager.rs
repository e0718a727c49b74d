//! Registry of open dashboard sockets.
//!
//! Each socket belongs to one signed-in clinician and may narrow its feed
//! to a single patient (the one open on that dashboard). Outbound frames
//! are queued on a per-socket channel drained by the socket's send task.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use stemsight_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

pub type ConnectionId = uuid::Uuid;

pub type WsSender = mpsc::UnboundedSender<Message>;

pub struct DashboardConnection {
    pub user_id: DbId,
    /// `None` until the dashboard asks to watch a patient; receives
    /// everything meanwhile.
    pub watching: Option<DbId>,
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

#[derive(Default)]
pub struct WsManager {
    connections: RwLock<HashMap<ConnectionId, DashboardConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a socket. The returned receiver feeds its send task.
    pub async fn add(
        &self,
        conn_id: ConnectionId,
        user_id: DbId,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (sender, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(
            conn_id,
            DashboardConnection {
                user_id,
                watching: None,
                sender,
                connected_at: chrono::Utc::now(),
            },
        );
        rx
    }

    pub async fn remove(&self, conn_id: ConnectionId) {
        self.connections.write().await.remove(&conn_id);
    }

    /// Narrow a socket to one patient, or widen it again with `None`.
    /// Returns false for an unknown socket.
    pub async fn watch(&self, conn_id: ConnectionId, patient_id: Option<DbId>) -> bool {
        match self.connections.write().await.get_mut(&conn_id) {
            Some(conn) => {
                conn.watching = patient_id;
                true
            }
            None => false,
        }
    }

    pub async fn watching(&self, conn_id: ConnectionId) -> Option<DbId> {
        self.connections
            .read()
            .await
            .get(&conn_id)
            .and_then(|c| c.watching)
    }

    /// Queue `message` on every socket interested in `patient_id`: those
    /// watching that patient and those watching nobody in particular.
    /// `None` reaches all sockets. Returns the number of sockets queued on.
    ///
    /// Closed channels are skipped; their receive loop unregisters them.
    pub async fn dispatch(&self, patient_id: Option<DbId>, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|c| match (c.watching, patient_id) {
                (Some(watched), Some(patient)) => watched == patient,
                _ => true,
            })
            .filter(|c| c.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Number of dashboards currently watching `patient_id`.
    pub async fn watcher_count(&self, patient_id: DbId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.watching == Some(patient_id))
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Close every socket and empty the registry.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        tracing::info!(count = conns.len(), "Closed all dashboard sockets");
        conns.clear();
    }

    pub async fn ping_all(&self) {
        for conn in self.connections.read().await.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}
