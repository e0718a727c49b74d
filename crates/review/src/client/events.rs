//! Detected patient events.

use async_trait::async_trait;
use serde_json::json;
use stemsight_core::review_status::ReviewStatus;
use stemsight_core::timestamp::validate_offset;
use stemsight_core::types::DbId;

use super::ApiClient;
use crate::error::ClientError;
use crate::log_feed::DetectionSource;
use crate::model::{Event, NewEvent};
use crate::timeline::EventStatusStore;

impl ApiClient {
    /// `GET /patient-events/video/{id}`, ordered by timestamp.
    pub async fn video_events(&self, video_id: DbId) -> Result<Vec<Event>, ClientError> {
        self.get(&format!("/patient-events/video/{video_id}")).await
    }

    /// `GET /patient-events/patient/{id}`
    pub async fn patient_events(&self, patient_id: DbId) -> Result<Vec<Event>, ClientError> {
        self.get(&format!("/patient-events/patient/{patient_id}")).await
    }

    /// `POST /patient-events`
    pub async fn create_event(&self, event: &NewEvent) -> Result<Event, ClientError> {
        validate_offset(event.timestamp_seconds, None).map_err(ClientError::Validation)?;
        self.post("/patient-events", event).await
    }

    /// `PATCH /patient-events/{id}/status`
    pub async fn set_event_status(
        &self,
        event_id: DbId,
        status: ReviewStatus,
    ) -> Result<Event, ClientError> {
        self.patch(
            &format!("/patient-events/{event_id}/status"),
            &json!({ "validation_status": status }),
        )
        .await
    }
}

#[async_trait]
impl EventStatusStore for ApiClient {
    async fn update_event_status(
        &self,
        event_id: DbId,
        status: ReviewStatus,
    ) -> Result<Event, ClientError> {
        self.set_event_status(event_id, status).await
    }
}

#[async_trait]
impl DetectionSource for ApiClient {
    async fn detections(&self, patient_id: DbId) -> Result<Vec<Event>, ClientError> {
        self.patient_events(patient_id).await
    }
}
