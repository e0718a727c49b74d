use std::sync::Arc;

use stemsight_events::{EmailDelivery, EventBus};

use crate::config::ServerConfig;
use crate::streaming::StreamHub;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stemsight_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Dashboard notification sockets.
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
    /// Live-stream rooms keyed by patient.
    pub stream_hub: Arc<StreamHub>,
    /// SMTP delivery. `None` when SMTP is not configured; reset links are
    /// then written to the log.
    pub email: Option<Arc<EmailDelivery>>,
}
