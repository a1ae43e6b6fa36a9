//! Hosting-API client: code search and content resolution.
//!
//! The [`CodeHost`] trait is the seam between the sweep pipeline and the
//! hosting provider. [`GithubClient`] is the production implementation;
//! tests substitute in-memory hosts.

use crate::error::{HostError, Result};
use crate::pagination::next_page_from_link;
use async_trait::async_trait;
use base64::Engine;
use keysweep_core::{FetchedContent, HostConfig, SearchHit};
use reqwest::header::LINK;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// One page of code-search results plus the discovered continuation.
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Result items on this page, in discovery order
    pub items: Vec<SearchHit>,
    /// Page number of the next page, if the response advertised one
    pub next_page: Option<u32>,
}

/// Access to the hosting provider's search and content endpoints.
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Fetch one page of code-search results for `query`.
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage>;

    /// Resolve a search hit to its decoded file content.
    async fn fetch_content(&self, hit: &SearchHit) -> Result<FetchedContent>;
}

/// GitHub code-search client.
pub struct GithubClient {
    client: Client,
    token: String,
    base_url: String,
    per_page: u32,
}

impl GithubClient {
    /// Create a client from hosting-API settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &HostConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            token: config.access_token.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

#[async_trait]
impl CodeHost for GithubClient {
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage> {
        let url = format!("{}/search/code", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .query(&[
                ("q", query),
                ("per_page", &self.per_page.to_string()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(HostError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(HostError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: "/search/code".to_string(),
            });
        }

        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_from_link);

        let body: SearchResponse = response.json().await?;
        let items = body
            .items
            .into_iter()
            .map(|item| SearchHit {
                repository: item.repository.full_name,
                path: item.path,
                content_url: item.url,
            })
            .collect();

        Ok(SearchPage { items, next_page })
    }

    async fn fetch_content(&self, hit: &SearchHit) -> Result<FetchedContent> {
        let response = self
            .authorized(self.client.get(&hit.content_url))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HostError::NotFound {
                url: hit.content_url.clone(),
            });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(HostError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(HostError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: hit.content_url.clone(),
            });
        }

        let body: ContentResponse = response.json().await?;
        let text = decode_file_content(&body.content)?;

        Ok(FetchedContent {
            text,
            repo: body.url,
            hash: body.sha,
        })
    }
}

/// Decode the base64 file body returned by the contents endpoint.
///
/// The API wraps the payload at 60 columns, so embedded newlines are
/// stripped before decoding.
pub fn decode_file_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| HostError::Decode(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    path: String,
    url: String,
    repository: SearchItemRepository,
}

#[derive(Debug, Deserialize)]
struct SearchItemRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    url: String,
    sha: String,
}
