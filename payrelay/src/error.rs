use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayRelayError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("base url can not be extended with path segments: {0}")]
    InvalidBaseUrl(String),

    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("serialize error: {0}")]
    Serialize(serde_json::Error),

    #[error("decode error: {0}")]
    Decode(serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("not found")]
    NotFound,

    /// Message reported by the server in the `{"error":{"message":..}}` body.
    #[error("{0}")]
    Api(String),

    #[error("unknown state: {0}")]
    UnknownState(String),
}

impl PayRelayError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
