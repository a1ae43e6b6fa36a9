//! Per-job sweep worker.
//!
//! A `SweepWorker` runs one job end to end: each query pattern is paged
//! through the hosting API in order, every hit is resolved to content,
//! candidates are extracted and validated, and confirmed hits are
//! delivered to the sink and the job's callback action.
//!
//! Failure domains follow the job contract: a stale content reference
//! or a rejected candidate skips one item; an authentication failure or
//! an uncompilable matcher aborts the job's remaining patterns.

use crate::action::{ActionRegistry, CallbackRunner};
use crate::error::Result;
use crate::matcher::PatternMatcher;
use crate::sink::ResultSink;
use crate::validator::CredentialValidator;
use async_trait::async_trait;
use keysweep_core::{ConfirmedHit, JobRunner, SweepFinding, SweepJob};
use keysweep_host::{CodeHost, HostError, SearchPager};
use std::sync::Arc;

/// Counters describing one job run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepReport {
    /// Query patterns fully paged through
    pub patterns_swept: usize,
    /// Search hits whose content was fetched and scanned
    pub items_scanned: usize,
    /// Findings delivered to the result sink
    pub findings: usize,
}

/// Executes one sweep job in isolation.
pub struct SweepWorker {
    host: Arc<dyn CodeHost>,
    validator: Arc<dyn CredentialValidator>,
    sink: Arc<dyn ResultSink>,
    callbacks: CallbackRunner,
    pager: SearchPager,
}

impl SweepWorker {
    /// Compose a worker from the pipeline's collaborators.
    #[must_use]
    pub fn new(
        host: Arc<dyn CodeHost>,
        validator: Arc<dyn CredentialValidator>,
        sink: Arc<dyn ResultSink>,
        actions: Arc<ActionRegistry>,
        pager: SearchPager,
    ) -> Self {
        Self {
            host,
            validator,
            sink,
            callbacks: CallbackRunner::new(actions),
            pager,
        }
    }

    /// Run `job` to completion, processing its patterns sequentially.
    pub async fn run(&self, job: &SweepJob) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        tracing::info!(job_id = %job.id, name = %job.name, patterns = job.patterns.len(), "starting sweep job");

        for pattern in job.patterns.iter().filter(|p| !p.is_empty()) {
            let hits = self.pager.collect(self.host.as_ref(), pattern).await?;
            tracing::debug!(job_id = %job.id, pattern, hits = hits.len(), "search pages collected");

            for hit in hits {
                let content = match self.host.fetch_content(&hit).await {
                    Ok(content) => content,
                    Err(HostError::NotFound { url }) => {
                        tracing::debug!(job_id = %job.id, url, "stale content reference, skipping item");
                        continue;
                    }
                    Err(err @ HostError::Unauthorized { .. }) => return Err(err.into()),
                    Err(err) => {
                        tracing::warn!(job_id = %job.id, error = %err, "content fetch failed, skipping item");
                        continue;
                    }
                };
                report.items_scanned += 1;

                let Some(candidates) = PatternMatcher::extract(&content.text, &job.matcher)?
                else {
                    continue;
                };

                let mut confirmed: Vec<ConfirmedHit> = Vec::new();
                for candidate in &candidates {
                    if let Some(hit) = self.validator.confirm(candidate).await {
                        confirmed.push(hit);
                    }
                }
                if confirmed.is_empty() {
                    continue;
                }

                let finding = SweepFinding {
                    job_id: job.id.clone(),
                    repo: content.repo,
                    keys: confirmed.clone(),
                    hash: content.hash,
                };
                if let Err(e) = self.sink.deliver(finding).await {
                    tracing::error!(job_id = %job.id, error = %e, "result sink rejected finding");
                }
                for hit in &confirmed {
                    self.callbacks
                        .run(&job.id, job.callback.as_deref(), hit)
                        .await;
                }
                report.findings += 1;
            }

            report.patterns_swept += 1;
        }

        tracing::info!(
            job_id = %job.id,
            patterns = report.patterns_swept,
            items = report.items_scanned,
            findings = report.findings,
            "sweep job finished"
        );
        Ok(report)
    }
}

#[async_trait]
impl JobRunner for SweepWorker {
    async fn run_job(&self, job: SweepJob) -> anyhow::Result<()> {
        self.run(&job).await?;
        Ok(())
    }
}
