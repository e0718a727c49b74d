use std::time::Duration;

use anyhow::Context;
use stemsight_core::types::DbId;

/// Default cap on detection log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Default seconds between detection log refreshes.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Viewer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// API root including the version prefix.
    pub api_url: String,
    pub email: String,
    pub password: String,
    /// Patient whose sessions are reviewed.
    pub patient_id: DbId,
    pub log_capacity: usize,
    pub poll_interval: Duration,
}

impl ViewerConfig {
    /// | Env Var               | Default                         |
    /// |-----------------------|---------------------------------|
    /// | `STEMSIGHT_API_URL`   | `http://127.0.0.1:8000/api/v1`  |
    /// | `STEMSIGHT_EMAIL`     | required                        |
    /// | `STEMSIGHT_PASSWORD`  | required                        |
    /// | `PATIENT_ID`          | required                        |
    /// | `LOG_CAPACITY`        | `100`                           |
    /// | `POLL_INTERVAL_SECS`  | `5`                             |
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var("STEMSIGHT_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api/v1".into());

        let email = std::env::var("STEMSIGHT_EMAIL").context("STEMSIGHT_EMAIL is required")?;
        let password =
            std::env::var("STEMSIGHT_PASSWORD").context("STEMSIGHT_PASSWORD is required")?;

        let patient_id: DbId = std::env::var("PATIENT_ID")
            .context("PATIENT_ID is required")?
            .parse()
            .context("PATIENT_ID must be a UUID")?;

        let log_capacity = std::env::var("LOG_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOG_CAPACITY);

        let poll_interval = poll_interval(std::env::var("POLL_INTERVAL_SECS").ok().as_deref())?;

        Ok(Self {
            api_url,
            email,
            password,
            patient_id,
            log_capacity,
            poll_interval,
        })
    }
}

/// Parse `POLL_INTERVAL_SECS`. Unset or unparsable falls back to the
/// default; zero is rejected.
fn poll_interval(raw: Option<&str>) -> anyhow::Result<Duration> {
    let secs = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
    anyhow::ensure!(secs > 0, "POLL_INTERVAL_SECS must be at least 1");
    Ok(Duration::from_secs(secs))
}
