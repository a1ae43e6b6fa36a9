//! Result delivery boundary.
//!
//! Confirmed findings leave the pipeline through a [`ResultSink`];
//! persistence is the embedding application's concern. Sink failures
//! are reported to the worker, which logs and continues the job.

use crate::error::{Result, SweepError};
use async_trait::async_trait;
use keysweep_core::SweepFinding;
use std::sync::Mutex;

/// Receives confirmed findings, one per file with live credentials.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver one finding.
    async fn deliver(&self, finding: SweepFinding) -> Result<()>;
}

/// Sink that logs findings and discards them.
pub struct LogSink;

#[async_trait]
impl ResultSink for LogSink {
    async fn deliver(&self, finding: SweepFinding) -> Result<()> {
        tracing::info!(
            job_id = %finding.job_id,
            repo = %finding.repo,
            keys = finding.keys.len(),
            hash = %finding.hash,
            "confirmed credential finding"
        );
        Ok(())
    }
}

/// In-memory sink collecting findings, for tests and embedding.
#[derive(Default)]
pub struct MemorySink {
    findings: Mutex<Vec<SweepFinding>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All findings delivered so far.
    pub fn findings(&self) -> Vec<SweepFinding> {
        self.findings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn deliver(&self, finding: SweepFinding) -> Result<()> {
        self.findings
            .lock()
            .map_err(|_| SweepError::Sink("sink lock poisoned".to_string()))?
            .push(finding);
        Ok(())
    }
}
