//! Domain error shared by every layer above `core`.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code used in the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let id = DbId::nil();
        let err = CoreError::NotFound { entity: "Note", id };
        assert_eq!(err.to_string(), format!("Note not found: {id}"));
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn validation_from_string_result() {
        let result: Result<(), String> = Err("bad".into());
        let err = result.map_err(CoreError::Validation).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "bad");
    }
}
