//! Session-review model for the STEMSight dashboard.
//!
//! A review session ties one recorded video to its detection timeline and
//! the clinicians' notes. The three views share a single notion of "current
//! time": timeline and notes emit seek requests, the [`video_surface`] moves
//! playback, and playback time-updates feed back into the [`notes`] panel so
//! a note can be pinned to the moment being watched.
//!
//! - [`session`] -- wires surface, timeline and notes together.
//! - [`client`] -- typed REST client for the STEMSight API.
//! - [`media`] -- live frame streams over WebSocket.
//! - [`gallery`] -- session summaries and their sort orders.
//! - [`log_feed`] -- periodically refreshed detection log.

pub mod client;
pub mod config;
pub mod error;
pub mod gallery;
pub mod log_feed;
pub mod media;
pub mod model;
pub mod notes;
pub mod session;
pub mod timeline;
pub mod video_surface;
