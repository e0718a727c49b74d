//! Live media sessions.
//!
//! A [`MediaSessionProvider`] turns a patient id into a stream of encoded
//! video frames. The implemented transport is [`FrameSocketProvider`]: raw
//! binary frames pushed over a WebSocket by the streaming endpoint.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use stemsight_core::types::DbId;
use tokio::sync::Mutex;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// Stream of encoded frames. Ends when the socket closes or the session is
/// closed.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ClientError>> + Send>>;

#[async_trait]
pub trait MediaSessionProvider: Send + Sync {
    /// Start watching a patient's live feed.
    async fn open(&self, patient_id: DbId) -> Result<FrameStream, ClientError>;

    /// Stop every stream this provider opened.
    async fn close(&self);
}

/// Derive the WebSocket URL of an API path from its HTTP base URL.
///
/// `http` becomes `ws` and `https` becomes `wss`. The access token travels
/// as a query parameter since browsers cannot set headers on upgrades.
pub fn websocket_url(http_base: &str, path: &str, token: &str) -> String {
    let base = if let Some(rest) = http_base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = http_base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        http_base.to_string()
    };
    format!("{}{}?token={}", base.trim_end_matches('/'), path, token)
}

/// Watches `/streaming/watch/{patient_id}` over a WebSocket.
pub struct FrameSocketProvider {
    base_url: String,
    token: String,
    cancel: Mutex<CancellationToken>,
}

impl FrameSocketProvider {
    /// * `base_url` - HTTP API root, e.g. `http://127.0.0.1:8000/api/v1`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }
}

#[async_trait]
impl MediaSessionProvider for FrameSocketProvider {
    async fn open(&self, patient_id: DbId) -> Result<FrameStream, ClientError> {
        let url = websocket_url(
            &self.base_url,
            &format!("/streaming/watch/{patient_id}"),
            &self.token,
        );
        let (ws_stream, _response) = connect_async(url.as_str()).await?;
        tracing::info!(patient_id = %patient_id, "Connected to live stream");

        let cancel = self.cancel.lock().await.child_token();
        let frames = futures::stream::unfold(
            (ws_stream, cancel),
            |(mut ws, cancel)| async move {
                loop {
                    let msg = tokio::select! {
                        _ = cancel.cancelled() => {
                            let _ = ws.close(None).await;
                            return None;
                        }
                        msg = ws.next() => msg,
                    };

                    match msg {
                        Some(Ok(Message::Binary(frame))) => return Some((Ok(frame), (ws, cancel))),
                        Some(Ok(Message::Close(_))) | None => return None,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Live stream socket error");
                            return None;
                        }
                    }
                }
            },
        );

        Ok(Box::pin(frames))
    }

    async fn close(&self) {
        let mut cancel = self.cancel.lock().await;
        cancel.cancel();
        *cancel = CancellationToken::new();
    }
}
