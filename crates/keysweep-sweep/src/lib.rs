//! Keysweep Sweep - Per-job credential sweep pipeline.
//!
//! This crate composes the per-job pipeline: search pagination feeds
//! content fetching, candidate extraction, issuing-service validation,
//! and finally result delivery plus an optional registered callback
//! action. One [`SweepWorker`] owns one job end to end.
//!
//! # Pipeline
//!
//! ```text
//! SearchPager -> fetch_content -> PatternMatcher -> CredentialValidator -> ResultSink
//!                                                                       -> CallbackRunner
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod action;
pub mod error;
pub mod matcher;
pub mod sink;
pub mod validator;
pub mod worker;

// Re-export commonly used types
pub use action::{Action, ActionError, ActionRegistry, CallbackRunner};
pub use error::{Result, SweepError};
pub use matcher::PatternMatcher;
pub use sink::{LogSink, MemorySink, ResultSink};
pub use validator::{CredentialValidator, IssuerValidator};
pub use worker::{SweepReport, SweepWorker};
