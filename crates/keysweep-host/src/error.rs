use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("hosting API rejected credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("content reference is stale: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode content: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, HostError>;
