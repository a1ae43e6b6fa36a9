//! Keysweep Host - Code-hosting API access.
//!
//! This crate wraps the hosting provider's paginated code-search and
//! content-fetch endpoints behind the [`CodeHost`] trait, with a
//! reqwest-backed GitHub implementation. Pagination follows the `Link`
//! response header's `next` relation up to a hard page cap.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod error;
pub mod pagination;

// Re-export commonly used types
pub use client::{CodeHost, GithubClient, SearchPage};
pub use error::{HostError, Result};
pub use pagination::SearchPager;
