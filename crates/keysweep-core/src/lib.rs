//! Keysweep Core - Foundation crate for the Keysweep sweep pipeline.
//!
//! This crate provides the shared data model, error handling, and
//! configuration management that all other Keysweep crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Sweep data model (`JobId`, `SweepJob`, `SearchHit`,
//!   `FetchedContent`, `Candidate`, `ConfirmedHit`, `SweepFinding`)
//! - [`runner`] - The scheduler/pipeline seam (`JobRunner`)
//!
//! # Example
//!
//! ```rust
//! use keysweep_core::{AppConfig, SweepJob};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration (falls back to defaults when no file exists)
//! let config = AppConfig::default();
//!
//! let job = SweepJob::new("leaked-api-keys", vec!["sk_".to_string()], "sk_[a-zA-Z0-9]{48}");
//! assert!(job.started_at.is_none());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod runner;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, HostConfig, IssuerConfig, SchedulerConfig};
pub use error::{ConfigError, ConfigResult, KeysweepError, Result};
pub use runner::JobRunner;
pub use types::{
    Candidate, ConfirmedHit, FetchedContent, JobId, JobOutcome, SearchHit, SweepFinding, SweepJob,
};
