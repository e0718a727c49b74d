use serde_json::json;
use stemsight_core::medical_history::{validate_diagnosis, validate_history_note};
use stemsight_core::types::DbId;

use super::ApiClient;
use crate::error::ClientError;
use crate::model::{MedicalHistory, MedicalHistoryChanges, NewMedicalHistory};

impl ApiClient {
    /// `GET /medical-history`, optionally narrowed to one patient.
    pub async fn medical_history(
        &self,
        patient_id: Option<DbId>,
    ) -> Result<Vec<MedicalHistory>, ClientError> {
        match patient_id {
            Some(id) => self.get(&format!("/medical-history?patient_id={id}")).await,
            None => self.get("/medical-history").await,
        }
    }

    /// `GET /medical-history/{id}`
    pub async fn medical_history_record(&self, id: DbId) -> Result<MedicalHistory, ClientError> {
        self.get(&format!("/medical-history/{id}")).await
    }

    /// `POST /medical-history`
    pub async fn create_medical_history(
        &self,
        record: &NewMedicalHistory,
    ) -> Result<MedicalHistory, ClientError> {
        validate_diagnosis(&record.diagnosis).map_err(ClientError::Validation)?;
        self.post("/medical-history", record).await
    }

    /// `PUT /medical-history/{id}`
    pub async fn update_medical_history(
        &self,
        id: DbId,
        changes: &MedicalHistoryChanges,
    ) -> Result<MedicalHistory, ClientError> {
        if let Some(diagnosis) = &changes.diagnosis {
            validate_diagnosis(diagnosis).map_err(ClientError::Validation)?;
        }
        if let Some(note) = &changes.note {
            validate_history_note(note).map_err(ClientError::Validation)?;
        }
        self.put(&format!("/medical-history/{id}"), changes).await
    }

    /// `PATCH /medical-history/{id}/note`
    pub async fn update_medical_history_note(
        &self,
        id: DbId,
        note: &str,
    ) -> Result<MedicalHistory, ClientError> {
        validate_history_note(note).map_err(ClientError::Validation)?;
        self.patch(&format!("/medical-history/{id}/note"), &json!({ "note": note }))
            .await
    }

    /// `DELETE /medical-history/{id}`. Admin only.
    pub async fn delete_medical_history(&self, id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/medical-history/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use stemsight_core::medical_history::MAX_HISTORY_NOTE_LENGTH;

    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:1/api/v1")
    }

    #[tokio::test]
    async fn blank_diagnosis_rejected_before_request() {
        let record = NewMedicalHistory {
            patient_id: DbId::nil(),
            doctor_id: DbId::nil(),
            diagnosis: "   ".into(),
            note: None,
        };
        assert_matches!(
            client().create_medical_history(&record).await,
            Err(ClientError::Validation(_))
        );

        let changes = MedicalHistoryChanges {
            diagnosis: Some(String::new()),
            ..Default::default()
        };
        assert_matches!(
            client().update_medical_history(DbId::nil(), &changes).await,
            Err(ClientError::Validation(_))
        );
    }

    #[tokio::test]
    async fn oversized_note_rejected_before_request() {
        let note = "x".repeat(MAX_HISTORY_NOTE_LENGTH + 1);
        assert_matches!(
            client().update_medical_history_note(DbId::nil(), &note).await,
            Err(ClientError::Validation(_))
        );
    }

    #[tokio::test]
    async fn record_calls_need_a_session() {
        let client = client();
        assert_matches!(
            client.medical_history_record(DbId::nil()).await,
            Err(ClientError::NotAuthenticated)
        );
        assert_matches!(
            client.update_medical_history_note(DbId::nil(), "").await,
            Err(ClientError::NotAuthenticated)
        );
        assert_matches!(
            client.delete_medical_history(DbId::nil()).await,
            Err(ClientError::NotAuthenticated)
        );
    }
}
