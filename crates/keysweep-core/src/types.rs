//! Shared types used across the Keysweep pipeline.
//!
//! This module defines the sweep data model: jobs, search hits, fetched
//! content, and the candidate/confirmed-hit pair produced by matching
//! and validation.

use crate::error::KeysweepError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for sweep job identifiers.
///
/// Job IDs are opaque strings assigned by the external job source; the
/// only local constraint is that they are non-empty and at most 64
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Create a new `JobId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or longer than 64 characters.
    pub fn new(id: impl Into<String>) -> Result<Self, KeysweepError> {
        let id = id.into();
        if id.is_empty() {
            return Err(KeysweepError::Validation(
                "invalid job ID: must not be empty".to_string(),
            ));
        }
        if id.len() > 64 {
            return Err(KeysweepError::Validation(format!(
                "invalid job ID: must be at most 64 characters, got {}",
                id.len()
            )));
        }
        Ok(Self(id))
    }

    /// Create a new random `JobId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of sweep work: one or more search queries, a matcher
/// expression, and an optional named callback action.
///
/// Field names at the serde boundary follow the job-source schema
/// (`startedAt`/`finishedAt`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepJob {
    /// Unique identifier assigned by the job source
    pub id: JobId,
    /// Human-readable job name (unique at the job source)
    pub name: String,
    /// Search queries issued against the hosting API, in order
    pub patterns: Vec<String>,
    /// Expression used to extract candidates from fetched content.
    /// May arrive wrapped in `/.../gm`-style delimiters.
    pub matcher: String,
    /// Optional name of a registered callback action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    /// Set when the scheduler claims the job; null while pending
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Set on terminal success, failure, or interruption
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl SweepJob {
    /// Create a new pending job with a generated ID.
    #[must_use]
    pub fn new(name: impl Into<String>, patterns: Vec<String>, matcher: impl Into<String>) -> Self {
        Self {
            id: JobId::generate(),
            name: name.into(),
            patterns,
            matcher: matcher.into(),
            callback: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// A job is pending when it has never been claimed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.started_at.is_none()
    }

    /// A job is in flight when claimed but not yet finished.
    ///
    /// Invariant: an in-flight job corresponds to exactly one active
    /// worker.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.started_at.is_some() && self.finished_at.is_none()
    }
}

/// Terminal state recorded when a job finishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobOutcome {
    /// All patterns processed
    Completed,
    /// Aborted by an unrecoverable error
    Failed {
        /// Error description
        message: String,
    },
    /// Forcibly stopped during shutdown
    Interrupted,
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "Completed"),
            Self::Failed { message } => write!(f, "Failed: {message}"),
            Self::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// One hosting-API code search result item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Owning repository, `owner/name` form
    pub repository: String,
    /// Path of the matched file within the repository
    pub path: String,
    /// API URL that resolves to the file content
    pub content_url: String,
}

/// Decoded file content resolved from a [`SearchHit`].
#[derive(Debug, Clone)]
pub struct FetchedContent {
    /// Decoded text body
    pub text: String,
    /// Repository reference URL reported by the hosting API
    pub repo: String,
    /// Content fingerprint (hosting-API sha) used for de-duplication
    pub hash: String,
}

/// An unvalidated substring suspected of being a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The extracted substring
    pub value: String,
}

impl Candidate {
    /// Wrap an extracted substring.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A candidate confirmed live by the issuing service, with the profile
/// data the service returned.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedHit {
    /// The validated credential
    pub key: String,
    /// Profile body returned by the issuing service's whoami endpoint
    pub profile: serde_json::Value,
}

/// The unit delivered to the result sink for one file with confirmed
/// credentials.
#[derive(Debug, Clone, Serialize)]
pub struct SweepFinding {
    /// Job that produced the finding
    pub job_id: JobId,
    /// Repository reference URL
    pub repo: String,
    /// All confirmed credentials found in the file
    pub keys: Vec<ConfirmedHit>,
    /// Content fingerprint of the file
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_validation() {
        assert!(JobId::new("job-1").is_ok());
        assert!(JobId::new("").is_err());
        assert!(JobId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_job_id_generate_is_valid() {
        let id = JobId::generate();
        assert!(JobId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_job_lifecycle_predicates() {
        let mut job = SweepJob::new("test", vec!["q1".to_string()], "sk_.*");
        assert!(job.is_pending());
        assert!(!job.is_in_flight());

        job.started_at = Some(Utc::now());
        assert!(!job.is_pending());
        assert!(job.is_in_flight());

        job.finished_at = Some(Utc::now());
        assert!(!job.is_in_flight());
    }

    #[test]
    fn test_job_serde_boundary_field_names() {
        let job = SweepJob::new("test", vec!["q1".to_string()], "sk_.*");
        let json = serde_json::to_value(&job).expect("serialize job");
        assert!(json.get("startedAt").is_some());
        assert!(json.get("finishedAt").is_some());
        // Callback is omitted when unset
        assert!(json.get("callback").is_none());
    }

    #[test]
    fn test_job_deserializes_without_timestamps() {
        let json = r#"{
            "id": "job-7",
            "name": "stripe keys",
            "patterns": ["sk_live"],
            "matcher": "/sk_live_[a-zA-Z0-9]{24}/gm"
        }"#;
        let job: SweepJob = serde_json::from_str(json).expect("deserialize job");
        assert_eq!(job.id.as_str(), "job-7");
        assert!(job.is_pending());
        assert!(job.callback.is_none());
    }
}
