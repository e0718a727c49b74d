//! One review session: a video with its detection timeline and notes.
//!
//! ```text
//! Timeline / Notes --seek--> VideoSurface --time update--> NotePanel
//! ```

use stemsight_core::review_status::{ReviewAction, ReviewStatus};
use stemsight_core::types::DbId;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::model::{Event, Note, Video};
use crate::notes::NotePanel;
use crate::timeline::{EventStatusStore, Timeline};
use crate::video_surface::{Player, VideoSurface};

pub struct SessionReview<P: Player> {
    video: Video,
    pub surface: VideoSurface<P>,
    pub timeline: Timeline,
    pub notes: NotePanel,
}

impl<P: Player> SessionReview<P> {
    pub fn new(video: Video, events: Vec<Event>, notes: Vec<Note>, player: P) -> Self {
        let mut surface = VideoSurface::new(player);
        surface.set_source(video.public_video_url.clone());

        Self {
            timeline: Timeline::new(events),
            notes: NotePanel::new(video.patient_id, Some(video.id), notes),
            surface,
            video,
        }
    }

    /// Fetch the video's events and notes, then build the session.
    pub async fn load(client: &ApiClient, video: Video, player: P) -> Result<Self, ClientError> {
        let (events, notes) =
            futures::try_join!(client.video_events(video.id), client.video_notes(video.id))?;

        tracing::info!(
            video_id = %video.id,
            events = events.len(),
            notes = notes.len(),
            "Session loaded",
        );
        Ok(Self::new(video, events, notes, player))
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn current_time(&self) -> f64 {
        self.surface.current_time()
    }

    /// Seek the surface and hand the resulting time to the note panel.
    pub async fn seek(&mut self, seconds: f64) -> f64 {
        let reported = self.surface.seek_to(seconds).await;
        self.notes.set_current_time(reported);
        reported
    }

    /// Returns the reported playback time, or `None` for an unknown event.
    pub async fn jump_to_event(&mut self, event_id: DbId) -> Option<f64> {
        let target = self.timeline.jump(event_id)?;
        Some(self.seek(target).await)
    }

    /// Returns `None` for unknown or unpinned notes.
    pub async fn jump_to_note(&mut self, note_id: DbId) -> Option<f64> {
        let target = self.notes.jump(note_id)?;
        Some(self.seek(target).await)
    }

    /// Native time-change notification from the player.
    pub fn on_time_update(&mut self, seconds: f64) {
        let seconds = self.surface.on_time_update(seconds);
        self.notes.set_current_time(seconds);
    }

    pub async fn review_event(
        &mut self,
        event_id: DbId,
        action: ReviewAction,
        store: Option<&dyn EventStatusStore>,
    ) -> Option<ReviewStatus> {
        self.timeline.review(event_id, action, store).await
    }
}
