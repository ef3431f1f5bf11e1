//! Shared types for the job manager.

use serde::Serialize;

use crate::error_cache::DEFAULT_ERROR_CACHE_CAPACITY;
use crate::job::BoxedJob;

/// Config for the worker pool and error cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobManagerConfig {
    /// Maximum concurrently running jobs; `None` starts every job immediately.
    pub max_capacity: Option<usize>,
    /// Number of most recent job errors to retain.
    pub error_cache_capacity: usize,
}

impl Default for JobManagerConfig {
    fn default() -> Self {
        Self {
            max_capacity: None,
            error_cache_capacity: DEFAULT_ERROR_CACHE_CAPACITY,
        }
    }
}

impl JobManagerConfig {
    /// Cap concurrently running jobs.
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Cap retained job errors.
    #[must_use]
    pub fn with_error_cache_capacity(mut self, error_cache_capacity: usize) -> Self {
        self.error_cache_capacity = error_cache_capacity;
        self
    }
}

/// Point-in-time counters for one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobMetricsSnapshot {
    /// Configured concurrency bound (`None` = unbounded).
    pub max_capacity: Option<usize>,
    /// Jobs queued or running.
    pub outstanding: usize,
    /// Jobs waiting for a free slot.
    pub queued: usize,
    /// Jobs currently executing.
    pub running: usize,
    /// Jobs finished, with or without error.
    pub finished: u64,
    /// Finished jobs that returned an error.
    pub failed: u64,
    /// Errors currently held by the error cache.
    pub retained_errors: usize,
}

pub(super) struct QueuedJob {
    pub(super) seq: u64,
    pub(super) job: BoxedJob,
}
