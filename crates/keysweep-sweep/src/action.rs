//! Callback execution for confirmed hits.
//!
//! Jobs may name a callback action to run per confirmed hit. Arbitrary
//! caller-supplied source is not executed; instead, actions are
//! registered by name at boot and a job's `callback` field selects one.
//! A failing action is logged and never aborts the worker running it.

use async_trait::async_trait;
use keysweep_core::{ConfirmedHit, JobId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error raised by a callback action.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ActionError(pub String);

/// A registered callback action, invoked once per confirmed hit.
#[async_trait]
pub trait Action: Send + Sync {
    /// Run the action for one confirmed hit.
    async fn run(&self, hit: &ConfirmedHit) -> std::result::Result<serde_json::Value, ActionError>;
}

/// Named actions available to jobs.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, action: Arc<dyn Action>) {
        self.actions.insert(name.into(), action);
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Action>> {
        self.actions.get(name)
    }
}

/// Runs a job's callback action for confirmed hits, isolated from the
/// pipeline's own failure domain.
pub struct CallbackRunner {
    registry: Arc<ActionRegistry>,
}

impl CallbackRunner {
    /// Create a runner over a registry of named actions.
    #[must_use]
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    /// Run the callback named by `callback` for `hit`.
    ///
    /// A job without a callback is a no-op returning `None`. An unknown
    /// name or a failing action is logged and also yields `None`;
    /// errors are never propagated to the worker.
    pub async fn run(
        &self,
        job_id: &JobId,
        callback: Option<&str>,
        hit: &ConfirmedHit,
    ) -> Option<serde_json::Value> {
        let name = callback?;

        let Some(action) = self.registry.get(name) else {
            tracing::warn!(%job_id, callback = name, "unknown callback action, skipping");
            return None;
        };

        match action.run(hit).await {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!(%job_id, callback = name, error = %e, "callback action failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder;

    #[async_trait]
    impl Action for Recorder {
        async fn run(
            &self,
            hit: &ConfirmedHit,
        ) -> std::result::Result<serde_json::Value, ActionError> {
            Ok(serde_json::json!({ "recorded": hit.key }))
        }
    }

    struct Failing;

    #[async_trait]
    impl Action for Failing {
        async fn run(
            &self,
            _hit: &ConfirmedHit,
        ) -> std::result::Result<serde_json::Value, ActionError> {
            Err(ActionError("boom".to_string()))
        }
    }

    fn hit() -> ConfirmedHit {
        ConfirmedHit {
            key: "sk_ABCDEFGHIJ".to_string(),
            profile: serde_json::json!({ "user": "leaky" }),
        }
    }

    fn job_id() -> JobId {
        JobId::new("job-1").expect("valid job id")
    }

    #[tokio::test]
    async fn test_no_callback_is_a_noop() {
        let runner = CallbackRunner::new(Arc::new(ActionRegistry::new()));
        assert!(runner.run(&job_id(), None, &hit()).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_callback_is_skipped() {
        let runner = CallbackRunner::new(Arc::new(ActionRegistry::new()));
        assert!(runner.run(&job_id(), Some("missing"), &hit()).await.is_none());
    }

    #[tokio::test]
    async fn test_registered_callback_runs() {
        let mut registry = ActionRegistry::new();
        registry.register("record", Arc::new(Recorder));
        let runner = CallbackRunner::new(Arc::new(registry));

        let output = runner.run(&job_id(), Some("record"), &hit()).await;
        assert_eq!(
            output,
            Some(serde_json::json!({ "recorded": "sk_ABCDEFGHIJ" }))
        );
    }

    #[tokio::test]
    async fn test_failing_callback_is_swallowed() {
        let mut registry = ActionRegistry::new();
        registry.register("fail", Arc::new(Failing));
        let runner = CallbackRunner::new(Arc::new(registry));

        assert!(runner.run(&job_id(), Some("fail"), &hit()).await.is_none());
    }
}
