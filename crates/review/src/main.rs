//! `stemsight-viewer` -- terminal session reviewer.
//!
//! Signs in, prints the patient's session gallery, loads the most recent
//! session's timeline and notes, then follows the live feed and detection
//! log until interrupted. See [`ViewerConfig::from_env`] for variables.

use std::sync::Arc;

use futures::StreamExt;
use stemsight_core::timestamp::format_timestamp;
use stemsight_review::client::ApiClient;
use stemsight_review::config::ViewerConfig;
use stemsight_review::gallery::{self, detection_chips, GallerySort};
use stemsight_review::log_feed::{spawn_detection_feed, DetectionLog};
use stemsight_review::media::{FrameSocketProvider, MediaSessionProvider};
use stemsight_review::session::SessionReview;
use stemsight_review::video_surface::Player;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Playback position without a media element behind it.
struct HeadlessPlayer {
    position: f64,
    duration: Option<f64>,
}

impl Player for HeadlessPlayer {
    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stemsight_viewer=info,stemsight_review=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ViewerConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, patient_id = %config.patient_id, "Starting stemsight-viewer");

    let client = Arc::new(ApiClient::new(config.api_url.clone()));
    let user = client.login(&config.email, &config.password).await?;
    tracing::info!(user_id = %user.id, display_name = %user.display_name, "Signed in");

    // -- gallery --------------------------------------------------------------

    let patient = client.patient(config.patient_id).await?;
    let videos = client.patient_videos(patient.id).await?;
    let events = client.patient_events(patient.id).await?;
    let notes = client.patient_notes(patient.id).await?;
    tracing::info!(
        patient = %patient.id,
        videos = videos.len(),
        detections = events.len(),
        notes = notes.len(),
        "Patient history loaded"
    );

    let mut sessions = gallery::summaries_from(std::slice::from_ref(&patient), &videos, &events);
    gallery::sort_sessions(&mut sessions, GallerySort::Latest);

    for session in &sessions {
        let (chips, overflow) = detection_chips(&session.detections);
        let colors: Vec<&str> = chips.iter().map(|d| d.color).collect();
        tracing::info!(
            patient = %session.patient_name,
            station = session.station.as_deref().unwrap_or("-"),
            started_at = %session.started_at,
            chips = ?colors,
            overflow,
            "{}",
            session.detection_label(),
        );
    }

    // -- latest session -------------------------------------------------------

    if let Some(latest) = sessions.first() {
        if let Some(video) = videos.iter().find(|v| v.id == latest.video_id).cloned() {
            let player = HeadlessPlayer {
                position: 0.0,
                duration: video.duration_seconds,
            };
            let review = SessionReview::load(&client, video, player).await?;

            for entry in review.timeline.entries() {
                tracing::info!(
                    at = %format_timestamp(entry.timestamp()),
                    title = %entry.event.title(),
                    color = entry.event.color(),
                    status = %entry.status,
                    "Timeline",
                );
            }
            for note in review.notes.notes() {
                tracing::info!(
                    at = note.timestamp_seconds.map(format_timestamp).as_deref().unwrap_or("-"),
                    author = %note.author,
                    "{}",
                    note.content,
                );
            }
        }
    }

    // -- live follow ----------------------------------------------------------

    let cancel = CancellationToken::new();
    let log = Arc::new(RwLock::new(DetectionLog::new(config.log_capacity)));
    let feed = spawn_detection_feed(
        client.clone(),
        patient.id,
        config.poll_interval,
        log.clone(),
        cancel.clone(),
    );

    let token = client.access_token().await.unwrap_or_default();
    let provider = FrameSocketProvider::new(config.api_url.clone(), token);
    let mut frames = provider.open(patient.id).await?;
    let mut frame_count: u64 = 0;

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = &mut interrupt => {
                tracing::info!("Interrupted");
                break;
            }
            frame = frames.next() => match frame {
                Some(Ok(bytes)) => {
                    frame_count += 1;
                    tracing::debug!(frame_count, size = bytes.len(), "Frame received");
                }
                Some(Err(e)) => tracing::warn!(error = %e, "Frame stream error"),
                None => {
                    tracing::info!(frame_count, "Live stream ended");
                    break;
                }
            },
        }
    }

    provider.close().await;
    cancel.cancel();
    let _ = feed.await;

    let log = log.read().await;
    tracing::info!(detections = log.len(), frame_count, "Session finished");
    if let Err(e) = client.logout().await {
        tracing::warn!(error = %e, "Logout failed");
    }
    Ok(())
}
