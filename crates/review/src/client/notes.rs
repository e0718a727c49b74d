use async_trait::async_trait;
use stemsight_core::notes::{validate_note_content, validate_note_timestamp};
use stemsight_core::types::DbId;

use super::ApiClient;
use crate::error::ClientError;
use crate::model::{NewNote, Note, NoteChanges};
use crate::notes::NoteStore;

impl ApiClient {
    /// `GET /notes/video/{id}`, newest first.
    pub async fn video_notes(&self, video_id: DbId) -> Result<Vec<Note>, ClientError> {
        self.get(&format!("/notes/video/{video_id}")).await
    }

    /// `GET /notes/patient/{id}`, newest first.
    pub async fn patient_notes(&self, patient_id: DbId) -> Result<Vec<Note>, ClientError> {
        self.get(&format!("/notes/patient/{patient_id}")).await
    }
}

#[async_trait]
impl NoteStore for ApiClient {
    /// `POST /notes`
    async fn create_note(&self, note: &NewNote) -> Result<Note, ClientError> {
        validate_note_content(&note.content).map_err(ClientError::Validation)?;
        validate_note_timestamp(note.timestamp_seconds, None).map_err(ClientError::Validation)?;
        self.post("/notes", note).await
    }

    /// `PUT /notes/{id}`
    async fn update_note(&self, note_id: DbId, changes: &NoteChanges) -> Result<Note, ClientError> {
        if let Some(content) = &changes.content {
            validate_note_content(content).map_err(ClientError::Validation)?;
        }
        validate_note_timestamp(changes.timestamp_seconds, None)
            .map_err(ClientError::Validation)?;
        self.put(&format!("/notes/{note_id}"), changes).await
    }

    /// `DELETE /notes/{id}`
    async fn delete_note(&self, note_id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/notes/{note_id}")).await
    }
}
