//! Dashboard notification sockets (`/api/v1/ws`).
//!
//! [`WsManager`] tracks open sockets and which patient each one is watching;
//! the notification forwarder pushes platform events through it.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{ws_handler, DashboardRequest};
pub use heartbeat::start_heartbeat;
pub use manager::{ConnectionId, WsManager};
