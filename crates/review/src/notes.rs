//! Note panel state.
//!
//! Holds the notes of one patient/video pair plus the transient editing
//! state: a draft, an optionally captured timestamp, at most one note in
//! edit mode and at most one pending delete. Persistence goes through a
//! [`NoteStore`]. A failed call is logged and returned, and the in-memory
//! list stays as it was.

use async_trait::async_trait;
use stemsight_core::notes::is_blank;
use stemsight_core::types::DbId;

use crate::error::ClientError;
use crate::model::{NewNote, Note, NoteChanges};

/// Persists notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create_note(&self, note: &NewNote) -> Result<Note, ClientError>;

    async fn update_note(&self, note_id: DbId, changes: &NoteChanges) -> Result<Note, ClientError>;

    async fn delete_note(&self, note_id: DbId) -> Result<(), ClientError>;
}

/// The single note currently in edit mode.
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub note_id: DbId,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NotePanel {
    patient_id: DbId,
    video_id: Option<DbId>,
    notes: Vec<Note>,
    /// Text of the note being composed.
    pub draft: String,
    captured_timestamp: Option<f64>,
    current_time: f64,
    editing: Option<EditState>,
    pending_delete: Option<DbId>,
}

impl NotePanel {
    /// `notes` is expected newest first, as the API lists them.
    pub fn new(patient_id: DbId, video_id: Option<DbId>, notes: Vec<Note>) -> Self {
        Self {
            patient_id,
            video_id,
            notes,
            draft: String::new(),
            captured_timestamp: None,
            current_time: 0.0,
            editing: None,
            pending_delete: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, note_id: DbId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    // -- playback time --------------------------------------------------------

    /// Latest playback offset reported by the video surface.
    pub fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Pin the draft to the current playback offset.
    pub fn capture_timestamp(&mut self) -> f64 {
        self.captured_timestamp = Some(self.current_time);
        self.current_time
    }

    pub fn clear_captured_timestamp(&mut self) {
        self.captured_timestamp = None;
    }

    pub fn captured_timestamp(&self) -> Option<f64> {
        self.captured_timestamp
    }

    /// Seek target for a note, if it is pinned to a moment.
    pub fn jump(&self, note_id: DbId) -> Option<f64> {
        self.get(note_id).and_then(|n| n.timestamp_seconds)
    }

    // -- create ---------------------------------------------------------------

    /// Persist the draft. Blank drafts are ignored and return `Ok(None)`.
    pub async fn create(&mut self, store: &dyn NoteStore) -> Result<Option<&Note>, ClientError> {
        if is_blank(&self.draft) {
            return Ok(None);
        }

        let input = NewNote {
            patient_id: self.patient_id,
            video_id: self.video_id,
            content: self.draft.trim().to_string(),
            timestamp_seconds: self.captured_timestamp,
        };

        match store.create_note(&input).await {
            Ok(note) => {
                tracing::debug!(note_id = %note.id, "Note created");
                self.notes.insert(0, note);
                self.draft.clear();
                self.captured_timestamp = None;
                Ok(self.notes.first())
            }
            Err(e) => {
                tracing::error!(patient_id = %self.patient_id, error = %e, "Failed to create note");
                Err(e)
            }
        }
    }

    // -- edit -----------------------------------------------------------------

    /// Put a note into edit mode. Any other edit in progress is dropped.
    pub fn begin_edit(&mut self, note_id: DbId) -> bool {
        match self.get(note_id) {
            Some(note) => {
                self.editing = Some(EditState {
                    note_id,
                    content: note.content.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    /// Replace the text of the note in edit mode.
    pub fn set_edit_content(&mut self, content: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.content = content.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save the note in edit mode. Blank content is ignored, leaving the
    /// note and the edit slot untouched.
    pub async fn save_edit(&mut self, store: &dyn NoteStore) -> Result<Option<&Note>, ClientError> {
        let Some(edit) = self.editing.clone() else {
            return Ok(None);
        };
        if is_blank(&edit.content) {
            return Ok(None);
        }

        let changes = NoteChanges {
            content: Some(edit.content.trim().to_string()),
            ..Default::default()
        };
        self.persist_update(store, edit.note_id, &changes).await?;
        self.editing = None;
        Ok(self.get(edit.note_id))
    }

    /// Re-pin an existing note to the current playback offset.
    pub async fn update_timestamp(
        &mut self,
        store: &dyn NoteStore,
        note_id: DbId,
    ) -> Result<Option<&Note>, ClientError> {
        let changes = NoteChanges {
            timestamp_seconds: Some(self.current_time),
            ..Default::default()
        };
        self.persist_update(store, note_id, &changes).await
    }

    async fn persist_update(
        &mut self,
        store: &dyn NoteStore,
        note_id: DbId,
        changes: &NoteChanges,
    ) -> Result<Option<&Note>, ClientError> {
        match store.update_note(note_id, changes).await {
            Ok(updated) => match self.notes.iter().position(|n| n.id == note_id) {
                Some(index) => {
                    self.notes[index] = updated;
                    Ok(self.notes.get(index))
                }
                None => Ok(None),
            },
            Err(e) => {
                tracing::error!(note_id = %note_id, error = %e, "Failed to update note");
                Err(e)
            }
        }
    }

    // -- delete ---------------------------------------------------------------

    /// First step of a delete: ask for confirmation.
    pub fn request_delete(&mut self, note_id: DbId) {
        self.pending_delete = Some(note_id);
    }

    pub fn pending_delete(&self) -> Option<DbId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step: delete the note awaiting confirmation. Returns the
    /// deleted id, or `None` when nothing was pending.
    pub async fn confirm_delete(
        &mut self,
        store: &dyn NoteStore,
    ) -> Result<Option<DbId>, ClientError> {
        let Some(note_id) = self.pending_delete else {
            return Ok(None);
        };

        if let Err(e) = store.delete_note(note_id).await {
            tracing::error!(note_id = %note_id, error = %e, "Failed to delete note");
            return Err(e);
        }

        if let Some(index) = self.notes.iter().position(|n| n.id == note_id) {
            self.notes.remove(index);
        }
        if self.editing.as_ref().is_some_and(|e| e.note_id == note_id) {
            self.editing = None;
        }
        self.pending_delete = None;
        tracing::debug!(note_id = %note_id, "Note deleted");
        Ok(Some(note_id))
    }
}
