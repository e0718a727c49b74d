/// Errors surfaced by the review client and model.
///
/// Nothing here is fatal: callers log the error, keep their previous state
/// and may show the message inline.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status} {code}): {message}")]
    Status {
        status: u16,
        /// Machine-readable code from the error body, e.g. `NOT_FOUND`.
        code: String,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("WebSocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Not authenticated")]
    NotAuthenticated,
}
