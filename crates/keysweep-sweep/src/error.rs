use keysweep_host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid matcher expression: {reason}")]
    BadMatcher { reason: String },

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("result sink error: {0}")]
    Sink(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;
