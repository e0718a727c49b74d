//! Medical history record validation.

/// Maximum length of a diagnosis string.
pub const MAX_DIAGNOSIS_LENGTH: usize = 2_000;

/// Maximum length of a medical history note.
pub const MAX_HISTORY_NOTE_LENGTH: usize = 10_000;

pub fn validate_diagnosis(diagnosis: &str) -> Result<(), String> {
    if diagnosis.trim().is_empty() {
        return Err("Diagnosis cannot be empty".to_string());
    }
    if diagnosis.chars().count() > MAX_DIAGNOSIS_LENGTH {
        return Err(format!(
            "Diagnosis exceeds maximum length of {MAX_DIAGNOSIS_LENGTH} characters"
        ));
    }
    Ok(())
}

/// The note is optional; an empty note clears it.
pub fn validate_history_note(note: &str) -> Result<(), String> {
    if note.chars().count() > MAX_HISTORY_NOTE_LENGTH {
        return Err(format!(
            "Note exceeds maximum length of {MAX_HISTORY_NOTE_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_diagnosis_rejected() {
        assert!(validate_diagnosis("  ").unwrap_err().contains("cannot be empty"));
    }

    #[test]
    fn diagnosis_over_limit_rejected() {
        let long = "d".repeat(MAX_DIAGNOSIS_LENGTH + 1);
        assert!(validate_diagnosis(&long).is_err());
        assert!(validate_diagnosis("Focal epilepsy").is_ok());
    }

    #[test]
    fn empty_history_note_allowed() {
        assert!(validate_history_note("").is_ok());
        assert!(validate_history_note(&"n".repeat(MAX_HISTORY_NOTE_LENGTH + 1)).is_err());
    }
}
