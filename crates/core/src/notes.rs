//! Clinical note constants and validation functions.

use crate::timestamp::validate_offset;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of note content in characters.
pub const MAX_NOTE_CONTENT_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Whether content is blank once surrounding whitespace is removed.
///
/// Blank content never reaches persistence: the review model treats it as
/// a no-op and the API rejects it.
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

/// Validate note content: must be non-blank and within the length limit.
pub fn validate_note_content(content: &str) -> Result<(), String> {
    if is_blank(content) {
        return Err("Note content cannot be empty".to_string());
    }
    if content.chars().count() > MAX_NOTE_CONTENT_LENGTH {
        return Err(format!(
            "Note content exceeds maximum length of {MAX_NOTE_CONTENT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate an optional note timestamp against an optional video duration.
pub fn validate_note_timestamp(
    timestamp: Option<f64>,
    video_duration: Option<f64>,
) -> Result<(), String> {
    match timestamp {
        Some(seconds) => validate_offset(seconds, video_duration),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
