//! Password-reset mail.
//!
//! Reset links go out over SMTP (STARTTLS) through `lettre`. Without
//! `SMTP_HOST` there is no [`EmailConfig`] and the API logs the link
//! instead, which is how local development works.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not assemble email: {0}")]
    Build(#[from] lettre::error::Error),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "STEMSight <noreply@stemsight.local>";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    /// Username and password, when the relay requires authentication.
    pub credentials: Option<(String, String)>,
}

impl EmailConfig {
    /// | Variable        | Default                                 |
    /// |-----------------|-----------------------------------------|
    /// | `SMTP_HOST`     | unset: email disabled                   |
    /// | `SMTP_PORT`     | `587`                                   |
    /// | `SMTP_FROM`     | `STEMSight <noreply@stemsight.local>`   |
    /// | `SMTP_USER`     | unset                                   |
    /// | `SMTP_PASSWORD` | unset                                   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty())?;

        let credentials = match (std::env::var("SMTP_USER"), std::env::var("SMTP_PASSWORD")) {
            (Ok(user), Ok(password)) => Some((user, password)),
            _ => None,
        };

        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            credentials,
        })
    }
}

/// Link a clinician follows to choose a new password.
pub fn password_reset_link(base_url: &str, token: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}token={token}")
}

/// Contents of a password-reset email.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetEmail<'a> {
    pub link: &'a str,
    pub expiry_mins: i64,
}

impl PasswordResetEmail<'_> {
    pub const SUBJECT: &'static str = "[STEMSight] Reset your password";

    pub fn body(&self) -> String {
        format!(
            "A password reset was requested for your STEMSight account.\n\n\
             Open the link below within {} minutes to choose a new password:\n\n\
             {}\n\n\
             If you did not ask for this, ignore this email. Your password stays unchanged.",
            self.expiry_mins, self.link
        )
    }
}

/// SMTP sender, built once at startup and shared through `AppState`.
pub struct EmailDelivery {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailDelivery {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let Some((user, password)) = &config.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from: config.from_address.parse()?,
        })
    }

    pub async fn send_password_reset(
        &self,
        to_email: &str,
        email: &PasswordResetEmail<'_>,
    ) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to_email.parse()?)
            .subject(PasswordResetEmail::SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body())?;

        self.mailer.send(message).await?;
        tracing::info!(to = to_email, "Password reset email sent");
        Ok(())
    }
}
