#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing credential `{0}` in config/credentials.toml")]
    MissingCredential(&'static str),

    #[error("unexpected response shape: {0}")]
    Unexpected(String),
}
