use std::sync::atomic::Ordering;

use crate::manager::types::JobMetricsSnapshot;

use super::JobManager;

impl JobManager {
    /// Aggregate counters for logs and status output.
    ///
    /// Counters are read independently, so under load the fields may be off
    /// by the jobs that changed state between reads.
    #[must_use]
    pub fn metrics(&self) -> JobMetricsSnapshot {
        let runtime = &self.runtime;
        let outstanding = runtime.tracker.outstanding();
        let running = runtime.running.load(Ordering::SeqCst).min(outstanding);

        JobMetricsSnapshot {
            max_capacity: self.max_capacity,
            outstanding,
            queued: outstanding - running,
            running,
            finished: runtime.finished.load(Ordering::SeqCst),
            failed: runtime.failed.load(Ordering::SeqCst),
            retained_errors: runtime.errors.len(),
        }
    }
}
