//! Video playback surface.
//!
//! The surface owns a [`Player`] (the media element) and turns seek requests
//! into playback moves. Seeking to the offset the player is already parked on
//! would be swallowed by most media elements, so every seek first nudges
//! playback slightly backwards, waits briefly, then lands on the target.

use std::time::Duration;

use stemsight_core::timestamp::clamp_offset;

/// How far before the target the nudge lands, in seconds.
pub const SEEK_NUDGE_SECONDS: f64 = 0.5;

/// Pause between the nudge and the real seek.
pub const SEEK_NUDGE_DELAY: Duration = Duration::from_millis(10);

/// The underlying media element.
///
/// Errors of the element itself are not caught or translated here.
pub trait Player: Send {
    /// Move playback to `seconds`.
    fn seek(&mut self, seconds: f64);

    /// Current playback offset in seconds.
    fn current_time(&self) -> f64;

    /// Total length, when the element knows it.
    fn duration(&self) -> Option<f64>;
}

pub struct VideoSurface<P: Player> {
    player: P,
    source: Option<String>,
    seek_target: Option<f64>,
    current_time: f64,
}

impl<P: Player> VideoSurface<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            source: None,
            seek_target: None,
            current_time: 0.0,
        }
    }

    /// Point the surface at a new video. Resets the seek target.
    pub fn set_source(&mut self, url: impl Into<String>) {
        self.source = Some(url.into());
        self.seek_target = None;
        self.current_time = 0.0;
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Last requested seek target, after clamping.
    pub fn seek_target(&self) -> Option<f64> {
        self.seek_target
    }

    /// Last time reported by the player.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.player.duration()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Seek to `target` seconds, clamped to `[0, duration]`.
    ///
    /// Always produces a visible move, even when `target` equals the
    /// previous target. Returns the offset reported by the player afterwards.
    pub async fn seek_to(&mut self, target: f64) -> f64 {
        let target = clamp_offset(target, self.player.duration());
        let nudge = (target - SEEK_NUDGE_SECONDS).max(0.0);

        tracing::trace!(target, nudge, "Seeking video surface");
        self.player.seek(nudge);
        tokio::time::sleep(SEEK_NUDGE_DELAY).await;
        self.player.seek(target);

        self.seek_target = Some(target);
        self.on_time_update(self.player.current_time())
    }

    /// Record a native time-change notification and report it upward.
    pub fn on_time_update(&mut self, seconds: f64) -> f64 {
        self.current_time = seconds;
        seconds
    }
}
