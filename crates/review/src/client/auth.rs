//! Sign-in, token rotation and password reset.

use serde::Deserialize;
use serde_json::json;
use stemsight_core::validation::{
    validate_email, validate_password_confirmation, validate_password_strength, validate_required,
};

use super::{ApiClient, Tokens};
use crate::error::ClientError;
use crate::model::{AuthSession, UserInfo};

#[derive(Deserialize)]
struct Message {
    message: String,
}

impl ApiClient {
    /// `POST /auth/login`. Field checks run before any request is made.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, ClientError> {
        validate_email(email).map_err(ClientError::Validation)?;
        validate_required("password", password).map_err(ClientError::Validation)?;

        let session: AuthSession = self
            .post_public("/auth/login", &json!({ "email": email, "password": password }))
            .await?;
        Ok(self.store_session(session).await)
    }

    /// `POST /auth/refresh`. Rotates both tokens.
    pub async fn refresh(&self) -> Result<UserInfo, ClientError> {
        let refresh_token = self.refresh_token().await.ok_or(ClientError::NotAuthenticated)?;
        let session: AuthSession = self
            .post_public("/auth/refresh", &json!({ "refresh_token": refresh_token }))
            .await?;
        Ok(self.store_session(session).await)
    }

    /// `POST /auth/logout`. Local tokens are dropped even if the call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.post_empty("/auth/logout").await;
        self.set_tokens(None).await;
        result
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> Result<UserInfo, ClientError> {
        self.get("/auth/me").await
    }

    /// `POST /auth/request-password-reset`. Returns the server's message,
    /// which is the same whether or not the account exists.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, ClientError> {
        validate_email(email).map_err(ClientError::Validation)?;
        let reply: Message = self
            .post_public("/auth/request-password-reset", &json!({ "email": email }))
            .await?;
        Ok(reply.message)
    }

    /// `POST /auth/confirm-password-reset`
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<String, ClientError> {
        validate_required("Token", token).map_err(ClientError::Validation)?;
        validate_password_strength(new_password).map_err(ClientError::Validation)?;
        validate_password_confirmation(new_password, confirm_password)
            .map_err(ClientError::Validation)?;

        let reply: Message = self
            .post_public(
                "/auth/confirm-password-reset",
                &json!({
                    "token": token,
                    "new_password": new_password,
                    "confirm_password": confirm_password,
                }),
            )
            .await?;
        Ok(reply.message)
    }

    async fn store_session(&self, session: AuthSession) -> UserInfo {
        tracing::debug!(user_id = %session.user.id, expires_in = session.expires_in, "Signed in");
        self.set_tokens(Some(Tokens {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }))
        .await;
        session.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_rejects_bad_email_before_request() {
        let client = ApiClient::new("http://127.0.0.1:1/api/v1");
        let err = client.login("not-an-email", "secret").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn reset_confirmation_mismatch_rejected() {
        let client = ApiClient::new("http://127.0.0.1:1/api/v1");
        let err = client
            .confirm_password_reset("token", "long-enough-1", "long-enough-2")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn refresh_without_session_is_refused() {
        let client = ApiClient::new("http://127.0.0.1:1/api/v1");
        assert!(matches!(
            client.refresh().await.unwrap_err(),
            ClientError::NotAuthenticated
        ));
    }
}
