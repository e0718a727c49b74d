//! Clinical detection vocabulary.
//!
//! Every automatically detected patient event carries one of these
//! categories. The display color is shared by the timeline dots and the
//! session gallery detection chips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of an automatically detected clinical event.
///
/// Serializes as its snake_case wire name and deserializes through
/// [`FromStr`], so request bodies get the same leniency as query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum EventCategory {
    Myoclonus,
    Tremor,
    Decerebrate,
    Decorticate,
    Ballistic,
    Versive,
    FigureOfFour,
    Fencer,
    Hemichorea,
}

/// All categories in display order.
pub const ALL_CATEGORIES: &[EventCategory] = &[
    EventCategory::Myoclonus,
    EventCategory::Tremor,
    EventCategory::Decerebrate,
    EventCategory::Decorticate,
    EventCategory::Ballistic,
    EventCategory::Versive,
    EventCategory::FigureOfFour,
    EventCategory::Fencer,
    EventCategory::Hemichorea,
];

/// Color used for categories without an assigned color.
pub const FALLBACK_COLOR: &str = "gray";

impl EventCategory {
    /// Wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Myoclonus => "myoclonus",
            Self::Tremor => "tremor",
            Self::Decerebrate => "decerebrate",
            Self::Decorticate => "decorticate",
            Self::Ballistic => "ballistic",
            Self::Versive => "versive",
            Self::FigureOfFour => "figure_of_four",
            Self::Fencer => "fencer",
            Self::Hemichorea => "hemichorea",
        }
    }

    /// Human readable title shown in the timeline.
    pub fn title(self) -> &'static str {
        match self {
            Self::Myoclonus => "Possible Myoclonus",
            Self::Tremor => "Tremor Detected",
            Self::Decerebrate => "Decerebrate Posture Detected",
            Self::Decorticate => "Decorticate Posture Detected",
            Self::Ballistic => "Ballistic Movements Detected",
            Self::Versive => "Versive Head Posture Detected",
            Self::FigureOfFour => "Figure of Four Posture Detected",
            Self::Fencer => "Fencer Posture Detected",
            Self::Hemichorea => "Hemichorea Detected",
        }
    }

    /// Display color name.
    pub fn color(self) -> &'static str {
        match self {
            Self::Myoclonus => "red",
            Self::Tremor => "yellow",
            Self::Decerebrate => "purple",
            Self::Decorticate => "blue",
            Self::Ballistic => "green",
            Self::Versive => "orange",
            Self::FigureOfFour | Self::Fencer | Self::Hemichorea => FALLBACK_COLOR,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    /// Case-insensitive parse. Spaces and hyphens are treated as underscores
    /// so `"Figure of four"` and `"figure-of-four"` both resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = ALL_CATEGORIES.iter().map(|c| c.as_str()).collect();
                format!(
                    "Invalid event category '{s}'. Must be one of: {}",
                    valid.join(", ")
                )
            })
    }
}

impl TryFrom<String> for EventCategory {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Color for a raw category string, falling back to gray when unknown.
pub fn color_for(raw: &str) -> &'static str {
    raw.parse::<EventCategory>()
        .map(EventCategory::color)
        .unwrap_or(FALLBACK_COLOR)
}
