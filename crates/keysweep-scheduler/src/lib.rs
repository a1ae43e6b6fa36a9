//! Keysweep Scheduler - Job queue and bounded worker pool.
//!
//! This crate owns the scheduling half of the sweep pipeline: an
//! ordered in-memory [`JobQueue`] with atomic claims, the [`JobStore`]
//! boundary to the external job source, and the timer-driven
//! [`Scheduler`] that dispatches each claimed job to an isolated worker
//! task, bounded by a configured pool size.
//!
//! Jobs are claimed in strict insertion order. A crashed or hung worker
//! still releases its pool slot; its job is marked finished-with-error
//! and never retried automatically.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod queue;
pub mod scheduler;
pub mod store;

// Re-export commonly used types
pub use error::{Result, SchedulerError};
pub use queue::JobQueue;
pub use scheduler::Scheduler;
pub use store::{JobStore, MemoryJobStore};
