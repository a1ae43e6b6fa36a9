//! Credential liveness validation against the issuing service.
//!
//! A candidate is confirmed by using it as the credential on the
//! issuing service's whoami endpoint. Any failure (unauthorized,
//! network error, malformed key) yields `None`; validation failures are
//! not distinguished from non-credentials and are never retried.

use async_trait::async_trait;
use keysweep_core::{Candidate, ConfirmedHit, IssuerConfig};
use reqwest::Client;
use std::time::Duration;

use crate::error::{Result, SweepError};

/// Confirms whether a candidate is a live credential.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Returns the confirmed hit with profile data, or `None` when the
    /// candidate fails the issuing-service call for any reason.
    async fn confirm(&self, candidate: &Candidate) -> Option<ConfirmedHit>;
}

/// Validator backed by the issuing service's user-profile endpoint.
pub struct IssuerValidator {
    client: Client,
    whoami_url: String,
}

impl IssuerValidator {
    /// Create a validator from issuing-service settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &IssuerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SweepError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            whoami_url: format!("{}/v1/user", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CredentialValidator for IssuerValidator {
    async fn confirm(&self, candidate: &Candidate) -> Option<ConfirmedHit> {
        let response = self
            .client
            .get(&self.whoami_url)
            .header("xi-api-key", &candidate.value)
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "candidate rejected by issuer");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "issuer call failed, discarding candidate");
                return None;
            }
        };

        match response.json::<serde_json::Value>().await {
            Ok(profile) => Some(ConfirmedHit {
                key: candidate.value.clone(),
                profile,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "issuer profile body unreadable, discarding candidate");
                None
            }
        }
    }
}
