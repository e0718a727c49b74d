//! Tri-state review status for detected events.
//!
//! A clinician walks each detection through `pending -> confirmed` or
//! `pending -> dismissed`. "Edit status" always returns the entry to
//! `pending`; no transition is ever refused.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status string stored in `patient_events.validation_status`.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_DISMISSED: &str = "dismissed";

/// All valid status values.
pub const VALID_REVIEW_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_CONFIRMED, STATUS_DISMISSED];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Confirmed,
    Dismissed,
}

/// An action a reviewer can take on a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Confirm,
    Dismiss,
    EditStatus,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Confirmed => STATUS_CONFIRMED,
            Self::Dismissed => STATUS_DISMISSED,
        }
    }

    /// Next status after `action`.
    pub fn apply(self, action: ReviewAction) -> ReviewStatus {
        match action {
            ReviewAction::Confirm => Self::Confirmed,
            ReviewAction::Dismiss => Self::Dismissed,
            ReviewAction::EditStatus => Self::Pending,
        }
    }

    pub fn is_reviewed(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_CONFIRMED => Ok(Self::Confirmed),
            STATUS_DISMISSED => Ok(Self::Dismissed),
            other => Err(format!(
                "Invalid review status '{other}'. Must be one of: {}",
                VALID_REVIEW_STATUSES.join(", ")
            )),
        }
    }
}

/// Validate a raw status string from a request body.
pub fn validate_review_status(status: &str) -> Result<(), String> {
    status.parse::<ReviewStatus>().map(|_| ())
}
