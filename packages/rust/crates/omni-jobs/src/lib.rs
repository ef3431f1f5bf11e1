//! omni-jobs - bounded-concurrency job manager.
//!
//! Accepts an unbounded stream of independently submitted jobs and runs them
//! with a configurable maximum concurrency:
//! - Capacity gate: fixed worker pool over one unbounded queue (submission never blocks)
//! - Error cache: bounded FIFO of the most recent job errors
//! - Completion tracker: fire-once signal when nothing is queued or running
//!
//! # Architecture
//!
//! ```text
//! add_job() ──► tracker.begin() ──► mpsc queue
//!                                      ↓
//!                         worker 1 .. worker N (one job each)
//!                                      ↓
//!                  Err ──► ErrorCache      tracker.finish() ──► Done
//! ```

pub mod backoff;
mod completion;
mod config;
mod error;
mod error_cache;
mod job;
mod manager;

pub use backoff::BackOff;
pub use completion::{CompletionTracker, Done};
pub use config::{
    JobsSettings, jobs_settings_paths, load_jobs_settings, load_jobs_settings_from_paths,
    read_jobs_settings, set_config_home_override,
};
pub use error::{JobsError, Result};
pub use error_cache::{DEFAULT_ERROR_CACHE_CAPACITY, ErrorCache, JobError};
pub use job::{BoxedJob, Job};
pub use manager::{JobManager, JobManagerConfig, JobMetricsSnapshot};
