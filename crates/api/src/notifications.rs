//! Pushes clinical events to dashboard sockets.
//!
//! Every [`PlatformEvent`] on the bus becomes one JSON text frame, delivered
//! to the dashboards watching the event's patient (and to dashboards not
//! narrowed to any patient):
//!
//! ```text
//! { "type": "event", "data": { "event_type": "note.created", "patient_id": "...", ... } }
//! ```

use std::sync::Arc;

use axum::extract::ws::Message;
use stemsight_events::PlatformEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

pub struct NotificationForwarder {
    ws_manager: Arc<WsManager>,
}

impl NotificationForwarder {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Forward until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification forwarder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification forwarder shutting down");
                    break;
                }
            }
        }
    }

    async fn forward(&self, event: &PlatformEvent) {
        let frame = match event_frame(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(event_type = %event.event_type, error = %e, "Failed to encode clinical event");
                return;
            }
        };
        let delivered = self.ws_manager.dispatch(event.patient_id, frame).await;
        tracing::trace!(event_type = %event.event_type, delivered, "Clinical event forwarded");
    }
}

pub fn event_frame(event: &PlatformEvent) -> Result<Message, serde_json::Error> {
    let body = serde_json::to_string(&serde_json::json!({
        "type": "event",
        "data": event,
    }))?;
    Ok(Message::Text(body.into()))
}
