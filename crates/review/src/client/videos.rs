use stemsight_core::types::DbId;

use super::ApiClient;
use crate::error::ClientError;
use crate::model::{NewVideo, Video};

impl ApiClient {
    /// `GET /videos`
    pub async fn videos(&self) -> Result<Vec<Video>, ClientError> {
        self.get("/videos").await
    }

    /// `POST /videos`
    pub async fn create_video(&self, video: &NewVideo) -> Result<Video, ClientError> {
        self.post("/videos", video).await
    }

    /// `DELETE /videos/{id}`. Admin only.
    pub async fn delete_video(&self, video_id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/videos/{video_id}")).await
    }
}
