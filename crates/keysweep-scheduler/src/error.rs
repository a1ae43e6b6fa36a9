use keysweep_core::JobId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("claim conflict: job {job_id} is already in flight")]
    ClaimConflict { job_id: JobId },

    #[error("job store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
