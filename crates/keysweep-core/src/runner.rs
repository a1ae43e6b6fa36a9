//! Seam between the scheduler and the per-job pipeline.

use crate::types::SweepJob;
use async_trait::async_trait;

/// Executes one claimed job end to end.
///
/// The scheduler dispatches each claimed job to an isolated task that
/// drives this trait; a returned error marks the job finished-with-error
/// and is never retried.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run `job` to completion.
    async fn run_job(&self, job: SweepJob) -> anyhow::Result<()>;
}
