//! Timer-driven scheduler dispatching jobs to isolated worker tasks.
//!
//! The scheduler ticks on a fixed interval. Each tick first drains exit
//! notifications from finished workers (releasing their pool slots),
//! then claims pending jobs while capacity allows and dispatches each
//! to its own spawned task. Dispatch is fire-and-forget: the tick never
//! awaits job completion.
//!
//! Worker isolation is two tasks deep: the work task drives the
//! [`JobRunner`]; a supervisor task awaits its join handle and reports
//! the outcome over a channel. A panic in the work task therefore
//! surfaces as a finished-with-error exit instead of crashing the
//! scheduler, and shutdown can abort the work task while the supervisor
//! still records the interruption.

use crate::error::Result;
use crate::queue::JobQueue;
use crate::store::JobStore;
use keysweep_core::{JobId, JobOutcome, JobRunner, SchedulerConfig, SweepJob};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinHandle};

/// Pool bookkeeping for one in-flight job.
struct WorkerSlot {
    work: AbortHandle,
    supervisor: JoinHandle<()>,
}

/// Completion notification from a worker's supervisor task.
struct WorkerExit {
    job_id: JobId,
    outcome: JobOutcome,
}

/// Coordinates the job queue and the bounded worker pool.
pub struct Scheduler {
    queue: JobQueue,
    store: Arc<dyn JobStore>,
    runner: Arc<dyn JobRunner>,
    max_workers: usize,
    tick_interval: Duration,
    slots: HashMap<JobId, WorkerSlot>,
    exit_tx: mpsc::UnboundedSender<WorkerExit>,
    exit_rx: mpsc::UnboundedReceiver<WorkerExit>,
}

impl Scheduler {
    /// Create a scheduler over a job store and a job runner.
    #[must_use]
    pub fn new(
        store: Arc<dyn JobStore>,
        runner: Arc<dyn JobRunner>,
        config: &SchedulerConfig,
    ) -> Self {
        let (exit_tx, exit_rx) = mpsc::unbounded_channel();
        Self {
            queue: JobQueue::new(),
            store,
            runner,
            max_workers: config.max_workers.max(1),
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            slots: HashMap::new(),
            exit_tx,
            exit_rx,
        }
    }

    /// Fill the queue with the store's pending jobs.
    ///
    /// # Errors
    /// Returns error when the job source is unreachable; scheduling
    /// cannot start without it.
    pub async fn load_pending(&mut self) -> Result<usize> {
        let jobs = self.store.pending_jobs().await?;
        let mut loaded = 0;
        for job in jobs {
            if self.queue.enqueue(job) {
                loaded += 1;
            }
        }
        tracing::info!(loaded, "loaded pending jobs from store");
        Ok(loaded)
    }

    /// Add a single pending job to the queue.
    pub fn enqueue(&self, job: SweepJob) -> bool {
        self.queue.enqueue(job)
    }

    /// Number of currently active workers.
    #[must_use]
    pub fn active_workers(&self) -> usize {
        self.slots.len()
    }

    /// Number of jobs waiting in the queue.
    #[must_use]
    pub fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Run the tick loop until `shutdown` fires or scheduling becomes
    /// impossible (job source unreachable).
    pub async fn run(&mut self, mut shutdown: oneshot::Receiver<()>) -> Result<()> {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::error!(error = %e, "scheduling halted");
                        self.shutdown().await;
                        return Err(e);
                    }
                }
                _ = &mut shutdown => {
                    self.shutdown().await;
                    return Ok(());
                }
            }
        }
    }

    /// One scheduling step: collect worker exits, then dispatch pending
    /// jobs while pool capacity allows. A full pool or an empty queue
    /// makes the tick a no-op; queued jobs simply wait.
    pub async fn tick(&mut self) -> Result<()> {
        self.drain_exits().await?;

        while self.slots.len() < self.max_workers {
            let job = match self.queue.claim_next() {
                Ok(Some(job)) => job,
                Ok(None) => break,
                Err(e) => {
                    // Single-writer discipline makes this unreachable;
                    // the later claim is rejected.
                    tracing::error!(error = %e, "queue claim rejected");
                    continue;
                }
            };

            if let Err(e) = self.store.mark_started(&job.id).await {
                self.queue.release(&job.id);
                return Err(e);
            }
            self.dispatch(job);
        }

        Ok(())
    }

    /// Forcibly stop all in-flight workers and record each job as
    /// interrupted. Idempotent.
    pub async fn shutdown(&mut self) {
        if !self.slots.is_empty() {
            tracing::info!(active = self.slots.len(), "aborting in-flight workers");
        }

        let slots: Vec<WorkerSlot> = self.slots.drain().map(|(_, slot)| slot).collect();
        for slot in &slots {
            slot.work.abort();
        }
        // Supervisors observe the cancellation and emit the final exit.
        for slot in slots {
            let _ = slot.supervisor.await;
        }

        while let Ok(exit) = self.exit_rx.try_recv() {
            self.queue.release(&exit.job_id);
            if let Err(e) = self.store.mark_finished(&exit.job_id, exit.outcome).await {
                tracing::error!(job_id = %exit.job_id, error = %e, "failed to record job outcome");
            }
        }
    }

    async fn drain_exits(&mut self) -> Result<()> {
        while let Ok(exit) = self.exit_rx.try_recv() {
            self.slots.remove(&exit.job_id);
            self.queue.release(&exit.job_id);
            tracing::info!(job_id = %exit.job_id, outcome = %exit.outcome, "worker exited");
            self.store.mark_finished(&exit.job_id, exit.outcome).await?;
        }
        Ok(())
    }

    fn dispatch(&mut self, job: SweepJob) {
        let job_id = job.id.clone();
        tracing::info!(%job_id, name = %job.name, "dispatching job to worker");

        let runner = Arc::clone(&self.runner);
        let work = tokio::spawn(async move { runner.run_job(job).await });
        let work_abort = work.abort_handle();

        let exit_tx = self.exit_tx.clone();
        let exit_id = job_id.clone();
        let supervisor = tokio::spawn(async move {
            let outcome = match work.await {
                Ok(Ok(())) => JobOutcome::Completed,
                Ok(Err(e)) => JobOutcome::Failed {
                    message: e.to_string(),
                },
                Err(join_err) if join_err.is_panic() => JobOutcome::Failed {
                    message: "worker panicked".to_string(),
                },
                Err(_) => JobOutcome::Interrupted,
            };
            let _ = exit_tx.send(WorkerExit {
                job_id: exit_id,
                outcome,
            });
        });

        self.slots.insert(
            job_id,
            WorkerSlot {
                work: work_abort,
                supervisor,
            },
        );
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Best effort: don't leak spawned tasks if the scheduler is
        // dropped without an explicit shutdown.
        for slot in self.slots.values() {
            slot.work.abort();
            slot.supervisor.abort();
        }
    }
}
