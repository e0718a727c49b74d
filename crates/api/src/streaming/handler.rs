use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use stemsight_core::error::CoreError;
use stemsight_core::types::DbId;
use stemsight_db::repositories::{PatientRepo, VideoRepo};
use stemsight_events::{event_types, PlatformEvent};
use tokio::sync::broadcast;

use super::hub::BroadcastLease;
use super::recorder::Recorder;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

async fn ensure_patient_exists(state: &AppState, patient_id: DbId) -> AppResult<()> {
    PatientRepo::find_by_id(&state.pool, patient_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id: patient_id,
        }))?;
    Ok(())
}

/// GET /api/v1/streaming/live/{patient_id}
///
/// Upgrade the bedside camera connection. The broadcaster slot is claimed
/// before the upgrade so a second camera gets a 409 instead of a socket.
pub async fn broadcast_handler(
    auth: AuthUser,
    Path(patient_id): Path<DbId>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    ensure_patient_exists(&state, patient_id).await?;
    let lease = state.stream_hub.open_broadcast(patient_id).await?;

    Ok(ws.on_upgrade(move |socket| run_broadcaster(socket, state, lease, patient_id, auth.user_id)))
}

async fn run_broadcaster(
    mut socket: WebSocket,
    state: AppState,
    lease: BroadcastLease,
    patient_id: DbId,
    user_id: DbId,
) {
    tracing::info!(patient_id = %patient_id, user_id = %user_id, "Live stream started");
    state.event_bus.publish(
        PlatformEvent::new(event_types::STREAM_STARTED)
            .for_patient(patient_id)
            .by(user_id),
    );

    let mut recorder = match &state.config.stream_recording_dir {
        Some(dir) => match Recorder::open(dir, patient_id).await {
            Ok(recorder) => Some(recorder),
            Err(e) => {
                tracing::error!(patient_id = %patient_id, error = %e, "Failed to open recording file");
                None
            }
        },
        None => None,
    };

    let mut frames: u64 = 0;
    while let Some(result) = socket.recv().await {
        match result {
            Ok(Message::Binary(frame)) => {
                frames += 1;
                if let Some(rec) = recorder.as_mut() {
                    if let Err(e) = rec.write(&frame).await {
                        tracing::error!(patient_id = %patient_id, error = %e, "Recording write failed, recording stopped");
                        recorder = None;
                    }
                }
                lease.room().publish(frame);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(patient_id = %patient_id, error = %e, "Broadcaster receive error");
                break;
            }
        }
    }

    drop(lease);
    state.stream_hub.release(patient_id).await;

    let video_id = match recorder {
        Some(rec) => finish_recording(&state, rec, patient_id).await,
        None => None,
    };

    tracing::info!(patient_id = %patient_id, frames, "Live stream ended");
    let mut ended = PlatformEvent::new(event_types::STREAM_ENDED)
        .for_patient(patient_id)
        .by(user_id);
    if let Some(video_id) = video_id {
        ended = ended.with_entity("video", video_id);
    }
    state.event_bus.publish(ended);
}

/// Flush the recording and register it as a video. Returns the video id.
async fn finish_recording(state: &AppState, recorder: Recorder, patient_id: DbId) -> Option<DbId> {
    let file_name = recorder.file_name().to_string();
    match recorder.finish().await {
        Ok(0) => return None,
        Ok(bytes) => {
            tracing::info!(patient_id = %patient_id, file = %file_name, bytes, "Recording flushed");
        }
        Err(e) => {
            tracing::error!(patient_id = %patient_id, error = %e, "Failed to flush recording");
            return None;
        }
    }

    let url = state.config.media_url(&file_name);
    match VideoRepo::upsert_recording(&state.pool, patient_id, &file_name, &url).await {
        Ok(video) => Some(video.id),
        Err(e) => {
            tracing::error!(patient_id = %patient_id, error = %e, "Failed to register recording");
            None
        }
    }
}

/// GET /api/v1/streaming/watch/{patient_id}
///
/// Upgrade a dashboard connection into a frame receiver. Viewers may
/// connect before the broadcaster and wait for frames.
pub async fn watch_handler(
    auth: AuthUser,
    Path(patient_id): Path<DbId>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    ensure_patient_exists(&state, patient_id).await?;

    Ok(ws.on_upgrade(move |socket| run_viewer(socket, state, patient_id, auth.user_id)))
}

async fn run_viewer(socket: WebSocket, state: AppState, patient_id: DbId, user_id: DbId) {
    let mut rx = state.stream_hub.subscribe(patient_id).await;
    tracing::info!(patient_id = %patient_id, user_id = %user_id, "Viewer connected");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Ok(bytes) => {
                    if sink.send(Message::Binary(bytes)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::debug!(patient_id = %patient_id, skipped = n, "Viewer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    drop(rx);
    state.stream_hub.release(patient_id).await;
    tracing::info!(patient_id = %patient_id, user_id = %user_id, "Viewer disconnected");
}
