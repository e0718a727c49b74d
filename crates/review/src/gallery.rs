//! Session gallery: one summary per recorded video, with its detections.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use stemsight_core::types::DbId;

use crate::model::{Event, Patient, Video};

/// Detection chips shown on a gallery card before collapsing into "+N".
pub const MAX_CHIPS: usize = 4;

/// A detection as shown on a gallery card.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub category: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub patient_id: DbId,
    pub patient_name: String,
    /// Recording station, taken from the video description when present.
    pub station: Option<String>,
    pub started_at: DateTime<Utc>,
    pub video_id: DbId,
    pub detections: Vec<Detection>,
}

impl SessionSummary {
    pub fn detection_count(&self) -> usize {
        self.detections.len()
    }

    /// Card label such as "1 detection" or "No detections".
    pub fn detection_label(&self) -> String {
        match self.detections.len() {
            0 => "No detections".to_string(),
            1 => "1 detection".to_string(),
            n => format!("{n} detections"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GallerySort {
    #[default]
    Latest,
    Oldest,
    MostDetections,
}

impl GallerySort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Oldest => "oldest",
            Self::MostDetections => "most_detections",
        }
    }
}

impl fmt::Display for GallerySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GallerySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "latest" => Ok(Self::Latest),
            "oldest" => Ok(Self::Oldest),
            "most_detections" => Ok(Self::MostDetections),
            other => Err(format!(
                "Invalid sort '{other}'. Must be one of: latest, oldest, most_detections"
            )),
        }
    }
}

/// Sort sessions in place. Ties keep their prior order.
pub fn sort_sessions(sessions: &mut [SessionSummary], sort: GallerySort) {
    match sort {
        GallerySort::Latest => sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at)),
        GallerySort::Oldest => sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at)),
        GallerySort::MostDetections => {
            sessions.sort_by(|a, b| b.detection_count().cmp(&a.detection_count()))
        }
    }
}

/// Chips to draw for a card and how many detections were left out.
pub fn detection_chips(detections: &[Detection]) -> (&[Detection], usize) {
    let shown = detections.len().min(MAX_CHIPS);
    (&detections[..shown], detections.len() - shown)
}

/// Build one summary per video. Videos of unknown patients are skipped.
pub fn summaries_from(
    patients: &[Patient],
    videos: &[Video],
    events: &[Event],
) -> Vec<SessionSummary> {
    let names: HashMap<DbId, String> = patients.iter().map(|p| (p.id, p.full_name())).collect();

    let mut by_video: HashMap<DbId, Vec<&Event>> = HashMap::new();
    for event in events {
        by_video.entry(event.video_id).or_default().push(event);
    }

    videos
        .iter()
        .filter_map(|video| {
            let patient_name = names.get(&video.patient_id)?.clone();
            let mut video_events = by_video.remove(&video.id).unwrap_or_default();
            video_events.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));

            Some(SessionSummary {
                patient_id: video.patient_id,
                patient_name,
                station: video.description.clone(),
                started_at: video.created_at,
                video_id: video.id,
                detections: video_events
                    .into_iter()
                    .map(|e| Detection {
                        category: e.category.clone(),
                        color: e.color(),
                    })
                    .collect(),
            })
        })
        .collect()
}
