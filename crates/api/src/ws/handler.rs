use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use stemsight_core::types::DbId;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::{ConnectionId, WsManager};

/// Requests a dashboard may send over its socket.
///
/// ```text
/// { "type": "watch", "patient_id": "..." }
/// { "type": "unwatch" }
/// ```
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardRequest {
    Watch { patient_id: DbId },
    Unwatch,
}

/// GET /api/v1/ws -- dashboard notification socket.
pub async fn ws_handler(
    auth: AuthUser,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, auth.user_id))
}

async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: DbId) {
    let conn_id = ConnectionId::new_v4();
    tracing::info!(conn_id = %conn_id, user_id = %user_id, "Dashboard socket connected");

    let mut outbound = ws_manager.add(conn_id, user_id).await;
    let (mut sink, mut stream) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str(text.as_str()) {
                Ok(DashboardRequest::Watch { patient_id }) => {
                    ws_manager.watch(conn_id, Some(patient_id)).await;
                    tracing::debug!(conn_id = %conn_id, patient_id = %patient_id, "Dashboard watching patient");
                }
                Ok(DashboardRequest::Unwatch) => {
                    ws_manager.watch(conn_id, None).await;
                }
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring malformed dashboard request");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Dashboard socket receive error");
                break;
            }
        }
    }

    ws_manager.remove(conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Dashboard socket disconnected");
}
