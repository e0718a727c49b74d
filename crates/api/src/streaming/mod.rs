//! Live patient video streams.
//!
//! One broadcaster (the bedside camera) per patient pushes binary frames over
//! `/streaming/live/{patient_id}`; any number of dashboards watch through
//! `/streaming/watch/{patient_id}`. Frames fan out through a
//! `tokio::sync::broadcast` channel held by the patient's [`StreamRoom`] and
//! are optionally appended to a per-day recording file.

mod handler;
pub mod hub;
pub mod recorder;

pub use handler::{broadcast_handler, watch_handler};
pub use hub::{BroadcastLease, StreamHub, StreamRoom};
