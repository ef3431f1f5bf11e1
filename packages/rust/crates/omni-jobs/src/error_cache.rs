//! Bounded FIFO cache of job errors.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Default number of retained job errors.
pub const DEFAULT_ERROR_CACHE_CAPACITY: usize = 100;

/// A job failure as retained by the cache (shared so snapshots are cheap).
pub type JobError = Arc<anyhow::Error>;

/// Ring buffer keeping the most recently recorded errors.
///
/// Once `capacity` entries are held, every new error evicts the oldest one.
/// All access goes through one mutex, so a snapshot never observes a partial
/// write.
#[derive(Debug)]
pub struct ErrorCache {
    capacity: usize,
    errors: Mutex<VecDeque<JobError>>,
}

impl ErrorCache {
    /// Create an empty cache; a capacity of `0` is clamped to `1`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            errors: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Maximum number of retained errors.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one error, evicting the oldest when full.
    pub fn record(&self, error: anyhow::Error) {
        let mut errors = self.errors.lock().unwrap_or_else(PoisonError::into_inner);
        if errors.len() >= self.capacity {
            let _ = errors.pop_front();
        }
        errors.push_back(Arc::new(error));
    }

    /// Record the error of a finished job; `Ok` is a no-op.
    ///
    /// Returns whether an error was recorded.
    pub fn record_outcome(&self, outcome: anyhow::Result<()>) -> bool {
        match outcome {
            Ok(()) => false,
            Err(error) => {
                self.record(error);
                true
            }
        }
    }

    /// Current contents, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<JobError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Number of retained errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no error is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ErrorCache {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(cache: &ErrorCache) -> Vec<String> {
        cache.snapshot().iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn evicts_oldest_when_full() {
        let cache = ErrorCache::new(3);
        for i in 0..5 {
            cache.record(anyhow::anyhow!("error {i}"));
        }
        assert_eq!(messages(&cache), vec!["error 2", "error 3", "error 4"]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn ok_outcome_is_ignored() {
        let cache = ErrorCache::new(2);
        assert!(!cache.record_outcome(Ok(())));
        assert!(cache.is_empty());
        assert!(cache.record_outcome(Err(anyhow::anyhow!("boom"))));
        assert_eq!(messages(&cache), vec!["boom"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = ErrorCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.record(anyhow::anyhow!("first"));
        cache.record(anyhow::anyhow!("second"));
        assert_eq!(messages(&cache), vec!["second"]);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let cache = ErrorCache::default();
        cache.record(anyhow::anyhow!("a"));
        let snapshot = cache.snapshot();
        cache.record(anyhow::anyhow!("b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_records_never_exceed_capacity() {
        let cache = Arc::new(ErrorCache::new(16));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.record(anyhow::anyhow!("worker {worker} error {i}"));
                        assert!(cache.snapshot().len() <= 16);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread");
        }
        assert_eq!(cache.len(), 16);
    }
}
