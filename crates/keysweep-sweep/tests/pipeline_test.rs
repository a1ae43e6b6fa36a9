//! Integration tests for the per-job sweep pipeline with in-memory
//! collaborators standing in for the hosting and issuing services.

use async_trait::async_trait;
use keysweep_core::{Candidate, ConfirmedHit, FetchedContent, SearchHit, SweepJob};
use keysweep_host::{CodeHost, HostError, SearchPage, SearchPager};
use keysweep_sweep::{
    Action, ActionError, ActionRegistry, CredentialValidator, MemorySink, SweepError, SweepWorker,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Serves one page per query, with per-path file bodies.
struct FixtureHost {
    files: HashMap<String, String>,
    stale_paths: Vec<String>,
}

impl FixtureHost {
    fn new(files: Vec<(&str, &str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, body)| (path.to_string(), body.to_string()))
                .collect(),
            stale_paths: Vec::new(),
        }
    }
}

#[async_trait]
impl CodeHost for FixtureHost {
    async fn search_page(&self, _query: &str, _page: u32) -> Result<SearchPage, HostError> {
        let mut paths: Vec<&String> = self
            .files
            .keys()
            .chain(self.stale_paths.iter())
            .collect();
        paths.sort();

        let items = paths
            .into_iter()
            .map(|path| SearchHit {
                repository: "octo/leaky".to_string(),
                path: path.clone(),
                content_url: format!("https://host.example.com/contents/{path}"),
            })
            .collect();
        Ok(SearchPage {
            items,
            next_page: None,
        })
    }

    async fn fetch_content(&self, hit: &SearchHit) -> Result<FetchedContent, HostError> {
        match self.files.get(&hit.path) {
            Some(body) => Ok(FetchedContent {
                text: body.clone(),
                repo: format!("https://host.example.com/repos/octo/leaky/{}", hit.path),
                hash: format!("sha-{}", hit.path),
            }),
            None => Err(HostError::NotFound {
                url: hit.content_url.clone(),
            }),
        }
    }
}

/// Confirms candidates on an allow-list, simulating the issuing
/// service's 200/401 responses.
struct AllowListValidator {
    live: Vec<String>,
}

#[async_trait]
impl CredentialValidator for AllowListValidator {
    async fn confirm(&self, candidate: &Candidate) -> Option<ConfirmedHit> {
        self.live.contains(&candidate.value).then(|| ConfirmedHit {
            key: candidate.value.clone(),
            profile: serde_json::json!({ "user": "leaky-dev" }),
        })
    }
}

struct ExplodingAction;

#[async_trait]
impl Action for ExplodingAction {
    async fn run(&self, _hit: &ConfirmedHit) -> Result<serde_json::Value, ActionError> {
        Err(ActionError("callback exploded".to_string()))
    }
}

fn worker_with(
    host: FixtureHost,
    live_keys: Vec<&str>,
    actions: ActionRegistry,
) -> (SweepWorker, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let worker = SweepWorker::new(
        Arc::new(host),
        Arc::new(AllowListValidator {
            live: live_keys.into_iter().map(String::from).collect(),
        }),
        Arc::clone(&sink) as Arc<dyn keysweep_sweep::ResultSink>,
        Arc::new(actions),
        SearchPager::default(),
    );
    (worker, sink)
}

#[tokio::test]
async fn confirmed_hit_reaches_the_sink() {
    let host = FixtureHost::new(vec![(
        "config.py",
        "API_KEY = \"sk_AAAAAAAAAAAAAAAAAAAA\"",
    )]);
    let (worker, sink) = worker_with(host, vec!["sk_AAAAAAAAAAAAAAAAAAAA"], ActionRegistry::new());

    let job = SweepJob::new("e2e", vec!["q1".to_string()], "sk_[A-Za-z0-9]{20}");
    let report = worker.run(&job).await.expect("job should complete");

    assert_eq!(report.patterns_swept, 1);
    assert_eq!(report.findings, 1);

    let findings = sink.findings();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].job_id, job.id);
    assert_eq!(findings[0].hash, "sha-config.py");
    assert_eq!(findings[0].keys.len(), 1);
    assert_eq!(findings[0].keys[0].key, "sk_AAAAAAAAAAAAAAAAAAAA");
}

#[tokio::test]
async fn rejected_candidates_are_discarded() {
    let host = FixtureHost::new(vec![(
        "config.py",
        "API_KEY = \"sk_AAAAAAAAAAAAAAAAAAAA\"",
    )]);
    // Validator confirms nothing: every candidate fails the issuer call.
    let (worker, sink) = worker_with(host, vec![], ActionRegistry::new());

    let job = SweepJob::new("reject", vec!["q1".to_string()], "sk_[A-Za-z0-9]{20}");
    let report = worker.run(&job).await.expect("job should complete");

    assert_eq!(report.findings, 0);
    assert!(sink.findings().is_empty());
}

#[tokio::test]
async fn stale_reference_skips_item_not_job() {
    let mut host = FixtureHost::new(vec![(
        "live.py",
        "token = sk_BBBBBBBBBBBBBBBBBBBB",
    )]);
    host.stale_paths.push("gone.py".to_string());
    let (worker, sink) = worker_with(host, vec!["sk_BBBBBBBBBBBBBBBBBBBB"], ActionRegistry::new());

    let job = SweepJob::new("stale", vec!["q1".to_string()], "sk_[A-Za-z0-9]{20}");
    let report = worker.run(&job).await.expect("job should complete");

    // The stale item is skipped; the live one still produces a finding.
    assert_eq!(report.items_scanned, 1);
    assert_eq!(sink.findings().len(), 1);
}

#[tokio::test]
async fn failing_callback_does_not_abort_the_job() {
    let host = FixtureHost::new(vec![(
        "config.py",
        "API_KEY = \"sk_AAAAAAAAAAAAAAAAAAAA\"",
    )]);
    let mut actions = ActionRegistry::new();
    actions.register("explode", Arc::new(ExplodingAction));
    let (worker, sink) = worker_with(host, vec!["sk_AAAAAAAAAAAAAAAAAAAA"], actions);

    let mut job = SweepJob::new("cb", vec!["q1".to_string()], "sk_[A-Za-z0-9]{20}");
    job.callback = Some("explode".to_string());

    let report = worker.run(&job).await.expect("job reaches done despite callback failure");
    assert_eq!(report.findings, 1);
    assert_eq!(sink.findings().len(), 1);
}

#[tokio::test]
async fn bad_matcher_aborts_the_job() {
    let host = FixtureHost::new(vec![("config.py", "anything")]);
    let (worker, _sink) = worker_with(host, vec![], ActionRegistry::new());

    let job = SweepJob::new("bad", vec!["q1".to_string()], "sk_[unclosed");
    let result = worker.run(&job).await;
    assert!(matches!(result, Err(SweepError::BadMatcher { .. })));
}

#[tokio::test]
async fn empty_patterns_are_ignored() {
    let host = FixtureHost::new(vec![("config.py", "no keys here")]);
    let (worker, _sink) = worker_with(host, vec![], ActionRegistry::new());

    let job = SweepJob::new(
        "empties",
        vec![String::new(), "q1".to_string()],
        "sk_[A-Za-z0-9]{20}",
    );
    let report = worker.run(&job).await.expect("job should complete");
    assert_eq!(report.patterns_swept, 1);
}
