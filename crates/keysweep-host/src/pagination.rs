//! Search pagination: Link-header continuation parsing and the pager.
//!
//! The hosting API advertises the next results page through a `Link`
//! response header (`rel="next"`). The relation being absent or
//! malformed means "last page" and is never an error; search endpoints
//! are bounded upstream, so a hard page cap limits how far one query is
//! followed.

use crate::client::CodeHost;
use crate::error::{HostError, Result};
use keysweep_core::SearchHit;

/// Default hard cap on pages fetched per query.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Extract the `page` parameter of the `rel="next"` continuation from a
/// `Link` header value.
///
/// Returns `None` when the relation is absent or any part of it is
/// malformed; both are treated as "last page" by the pager.
#[must_use]
pub fn next_page_from_link(link: &str) -> Option<u32> {
    for part in link.split(',') {
        let mut sections = part.splitn(2, ';');
        let (Some(url_part), Some(params)) = (sections.next(), sections.next()) else {
            continue;
        };
        // The relation value is matched case-insensitively; some
        // responses carry rel="Next".
        if !params.to_ascii_lowercase().contains("rel=\"next\"") {
            continue;
        }

        let url_str = url_part.trim();
        let Some(url_str) = url_str
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
        else {
            continue;
        };
        let Ok(url) = reqwest::Url::parse(url_str) else {
            continue;
        };

        return url.query_pairs().find_map(|(key, value)| {
            if key == "page" {
                value.parse().ok()
            } else {
                None
            }
        });
    }

    None
}

/// Pages through the hosting API's search endpoint for one query.
///
/// Each call to [`SearchPager::collect`] starts a fresh page-1 request;
/// the pager is finite and not restartable mid-sequence.
#[derive(Debug, Clone)]
pub struct SearchPager {
    max_pages: u32,
}

impl Default for SearchPager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}

impl SearchPager {
    /// Create a pager with a hard cap on pages fetched per query.
    #[must_use]
    pub fn new(max_pages: u32) -> Self {
        Self { max_pages }
    }

    /// Enumerate all search hits for `query`, following continuations
    /// until none is advertised or the page cap is reached.
    ///
    /// Hitting the cap means "enough data for this job", not an error.
    /// A failed continuation request is treated as the last page; only
    /// an authentication failure on the first request aborts the query.
    pub async fn collect(&self, host: &dyn CodeHost, query: &str) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::new();
        let mut page = 1;
        let mut pages_fetched = 0;

        while pages_fetched < self.max_pages {
            let result = host.search_page(query, page).await;
            pages_fetched += 1;

            let search_page = match result {
                Ok(search_page) => search_page,
                Err(err @ HostError::Unauthorized { .. }) if pages_fetched == 1 => {
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        query,
                        page,
                        error = %err,
                        "search page request failed, treating as last page"
                    );
                    break;
                }
            };

            hits.extend(search_page.items);

            match search_page.next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(hits)
    }
}
