//! Job-source boundary.
//!
//! The external job source persists job records and their
//! `startedAt`/`finishedAt` lifecycle timestamps; this crate only
//! consumes it through [`JobStore`]. [`MemoryJobStore`] is the
//! in-process implementation used by tests and the standalone daemon.

use crate::error::{Result, SchedulerError};
use async_trait::async_trait;
use chrono::Utc;
use keysweep_core::{JobId, JobOutcome, SweepJob};
use std::sync::Mutex;

/// External source of sweep jobs.
///
/// Inability to reach the store is the one scheduling-fatal condition:
/// the scheduler reports it and halts rather than retrying.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// All jobs whose `started_at` is still null, in creation order.
    async fn pending_jobs(&self) -> Result<Vec<SweepJob>>;

    /// Record that the scheduler claimed `id` (stamps `started_at`).
    async fn mark_started(&self, id: &JobId) -> Result<()>;

    /// Record a terminal state for `id` (stamps `finished_at`).
    async fn mark_finished(&self, id: &JobId, outcome: JobOutcome) -> Result<()>;
}

struct StoredJob {
    job: SweepJob,
    outcome: Option<JobOutcome>,
}

/// In-memory job store.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Vec<StoredJob>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job record.
    pub fn insert(&self, job: SweepJob) {
        self.lock().push(StoredJob { job, outcome: None });
    }

    /// Current state of a job record.
    pub fn get(&self, id: &JobId) -> Option<SweepJob> {
        self.lock()
            .iter()
            .find(|stored| &stored.job.id == id)
            .map(|stored| stored.job.clone())
    }

    /// Terminal outcome recorded for a job, if any.
    pub fn outcome(&self, id: &JobId) -> Option<JobOutcome> {
        self.lock()
            .iter()
            .find(|stored| &stored.job.id == id)
            .and_then(|stored| stored.outcome.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoredJob>> {
        self.jobs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn pending_jobs(&self) -> Result<Vec<SweepJob>> {
        Ok(self
            .lock()
            .iter()
            .filter(|stored| stored.job.is_pending())
            .map(|stored| stored.job.clone())
            .collect())
    }

    async fn mark_started(&self, id: &JobId) -> Result<()> {
        let mut jobs = self.lock();
        let stored = jobs
            .iter_mut()
            .find(|stored| &stored.job.id == id)
            .ok_or_else(|| SchedulerError::Store(format!("unknown job {id}")))?;
        stored.job.started_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_finished(&self, id: &JobId, outcome: JobOutcome) -> Result<()> {
        let mut jobs = self.lock();
        let stored = jobs
            .iter_mut()
            .find(|stored| &stored.job.id == id)
            .ok_or_else(|| SchedulerError::Store(format!("unknown job {id}")))?;
        stored.job.finished_at = Some(Utc::now());
        stored.outcome = Some(outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pending_filter_and_lifecycle() {
        let store = MemoryJobStore::new();
        let job = SweepJob::new("a", vec!["q".to_string()], "sk_.*");
        let id = job.id.clone();
        store.insert(job);

        assert_eq!(store.pending_jobs().await.expect("pending").len(), 1);

        store.mark_started(&id).await.expect("mark started");
        assert!(store.pending_jobs().await.expect("pending").is_empty());
        assert!(store.get(&id).expect("job").is_in_flight());

        store
            .mark_finished(&id, JobOutcome::Completed)
            .await
            .expect("mark finished");
        let job = store.get(&id).expect("job");
        assert!(job.finished_at.is_some());
        assert_eq!(store.outcome(&id), Some(JobOutcome::Completed));
    }

    #[tokio::test]
    async fn test_unknown_job_is_a_store_error() {
        let store = MemoryJobStore::new();
        let id = JobId::new("ghost").expect("valid id");
        let result = store.mark_started(&id).await;
        assert!(matches!(result, Err(SchedulerError::Store(_))));
    }
}
