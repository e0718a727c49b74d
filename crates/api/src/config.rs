use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    pub password_reset: PasswordResetConfig,
    /// Directory live streams are recorded into. `None` disables recording.
    pub stream_recording_dir: Option<PathBuf>,
    /// Base URL recorded and uploaded videos are served from.
    pub media_public_base_url: String,
}

/// Where reset links point and how long they stay valid.
#[derive(Debug, Clone)]
pub struct PasswordResetConfig {
    pub url: String,
    pub expiry_mins: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                      |
    /// |-----------------------------|----------------------------------------------|
    /// | `HOST`                      | `0.0.0.0`                                    |
    /// | `PORT`                      | `8000`                                       |
    /// | `CORS_ORIGINS`              | `http://localhost:3000,http://127.0.0.1:3000`|
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                                         |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                                         |
    /// | `PASSWORD_RESET_URL`        | `http://localhost:3000/password-reset`       |
    /// | `PASSWORD_RESET_EXPIRY_MINS`| `30`                                         |
    /// | `STREAM_RECORDING_DIR`      | unset (recording disabled)                   |
    /// | `MEDIA_PUBLIC_BASE_URL`     | `http://localhost:8000/media`                |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let password_reset = PasswordResetConfig {
            url: std::env::var("PASSWORD_RESET_URL")
                .unwrap_or_else(|_| "http://localhost:3000/password-reset".into()),
            expiry_mins: std::env::var("PASSWORD_RESET_EXPIRY_MINS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("PASSWORD_RESET_EXPIRY_MINS must be a valid i64"),
        };

        let stream_recording_dir = std::env::var("STREAM_RECORDING_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let media_public_base_url = std::env::var("MEDIA_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/media".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            password_reset,
            stream_recording_dir,
            media_public_base_url,
        }
    }

    /// Public URL for a stored media file.
    pub fn media_url(&self, file_path: &str) -> String {
        format!(
            "{}/{}",
            self.media_public_base_url.trim_end_matches('/'),
            file_path.trim_start_matches('/')
        )
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
