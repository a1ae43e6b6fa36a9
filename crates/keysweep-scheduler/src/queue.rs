//! Ordered in-memory job queue with atomic claims.
//!
//! The queue is the single source of work for the scheduler. Claiming
//! moves a job's id into the in-flight set under the same lock that
//! pops it, so a job can never be handed to two workers. Only the
//! scheduler claims; only a finished worker's exit releases.

use crate::error::{Result, SchedulerError};
use keysweep_core::{JobId, SweepJob};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<SweepJob>,
    queued_ids: HashSet<JobId>,
    in_flight: HashSet<JobId>,
}

/// First-in-first-claimed queue of pending sweep jobs.
#[derive(Default)]
pub struct JobQueue {
    state: Mutex<QueueState>,
}

impl JobQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pending job. Returns false (and leaves the queue
    /// untouched) when the id is already queued or in flight.
    pub fn enqueue(&self, job: SweepJob) -> bool {
        let mut state = self.lock();
        if state.queued_ids.contains(&job.id) || state.in_flight.contains(&job.id) {
            tracing::debug!(job_id = %job.id, "duplicate enqueue ignored");
            return false;
        }
        state.queued_ids.insert(job.id.clone());
        state.pending.push_back(job);
        true
    }

    /// Atomically remove and return the earliest-inserted pending job,
    /// marking it in flight. Returns `Ok(None)` when the queue is empty.
    ///
    /// # Errors
    /// `ClaimConflict` if the popped job is somehow already in flight.
    /// Under the single-writer discipline this cannot happen; a conflict
    /// means the later claim is rejected and the job is dropped.
    pub fn claim_next(&self) -> Result<Option<SweepJob>> {
        let mut state = self.lock();
        let Some(job) = state.pending.pop_front() else {
            return Ok(None);
        };
        state.queued_ids.remove(&job.id);
        if !state.in_flight.insert(job.id.clone()) {
            return Err(SchedulerError::ClaimConflict {
                job_id: job.id.clone(),
            });
        }
        Ok(Some(job))
    }

    /// Release an in-flight id after its worker exits.
    pub fn release(&self, id: &JobId) {
        self.lock().in_flight.remove(id);
    }

    /// Number of pending jobs.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// True when no jobs are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
