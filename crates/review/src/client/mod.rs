//! REST client for the STEMSight API.
//!
//! Wraps the `/api/v1` endpoints using [`reqwest`]. Successful responses
//! arrive in a `{ "data": ... }` envelope which is unwrapped here; error
//! bodies (`{ "error": ..., "code": ... }`) become [`ClientError::Status`].
//!
//! Endpoint groups live in submodules as further `impl ApiClient` blocks.

mod auth;
mod events;
mod medical_history;
mod notes;
mod patients;
mod videos;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ClientError;

/// Access and refresh token of the signed-in user.
#[derive(Debug, Clone)]
pub(crate) struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// HTTP client for one STEMSight API server.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: RwLock<Option<Tokens>>,
}

impl ApiClient {
    /// * `base_url` - API root including the version prefix, e.g.
    ///   `http://127.0.0.1:8000/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn set_tokens(&self, tokens: Option<Tokens>) {
        *self.tokens.write().await = tokens;
    }

    pub(crate) async fn refresh_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.refresh_token.clone())
    }

    /// Current access token, if signed in.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.access_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    // ---- request helpers ----

    async fn authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.access_token().await.ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.authorized(self.http.get(self.url(path))).await?;
        Self::parse_response(request.send().await?).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.authorized(self.http.post(self.url(path))).await?;
        Self::parse_response(request.json(body).send().await?).await
    }

    /// POST without a bearer token (login, refresh, password reset).
    pub(crate) async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::parse_response(response).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.authorized(self.http.put(self.url(path))).await?;
        Self::parse_response(request.json(body).send().await?).await
    }

    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.authorized(self.http.patch(self.url(path))).await?;
        Self::parse_response(request.json(body).send().await?).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.authorized(self.http.delete(self.url(path))).await?;
        Self::check_status(request.send().await?).await
    }

    /// POST with a bearer token, discarding the body.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ClientError> {
        let request = self.authorized(self.http.post(self.url(path))).await?;
        Self::check_status(request.send().await?).await
    }

    /// Turn a non-2xx response into [`ClientError::Status`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.code, body.error),
            Err(_) => (String::new(), text),
        };
        Err(ClientError::Status {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
