//! Patient and doctor roster endpoints.

use stemsight_core::types::DbId;

use super::ApiClient;
use crate::error::ClientError;
use crate::model::{Doctor, Patient, Video};

impl ApiClient {
    /// `GET /patients`
    pub async fn patients(&self) -> Result<Vec<Patient>, ClientError> {
        self.get("/patients").await
    }

    /// `GET /patients/{id}`
    pub async fn patient(&self, patient_id: DbId) -> Result<Patient, ClientError> {
        self.get(&format!("/patients/{patient_id}")).await
    }

    /// `GET /patients/{id}/videos`
    pub async fn patient_videos(&self, patient_id: DbId) -> Result<Vec<Video>, ClientError> {
        self.get(&format!("/patients/{patient_id}/videos")).await
    }

    /// `GET /doctors`
    pub async fn doctors(&self) -> Result<Vec<Doctor>, ClientError> {
        self.get("/doctors").await
    }

    /// `GET /doctors/{id}`
    pub async fn doctor(&self, doctor_id: DbId) -> Result<Doctor, ClientError> {
        self.get(&format!("/doctors/{doctor_id}")).await
    }
}
