use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Ping every dashboard socket every 30 s.
/// The task runs until its handle is aborted at shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        loop {
            ticker.tick().await;
            let connections = ws_manager.connection_count().await;
            tracing::trace!(connections, "Dashboard heartbeat");
            ws_manager.ping_all().await;
        }
    })
}
