//! Core runtime for capacity-gated job execution.

mod metrics;
mod runtime;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::completion::{CompletionTracker, Done};
use crate::error_cache::{ErrorCache, JobError};
use crate::job::{BoxedJob, Job};
use crate::manager::types::{JobManagerConfig, QueuedJob};

/// State shared between the manager and its workers.
///
/// Workers hold this, never the manager itself, so dropping the manager
/// closes the queue and lets idle workers exit once it is drained.
struct JobRuntime {
    errors: ErrorCache,
    tracker: CompletionTracker,
    running: AtomicUsize,
    finished: AtomicU64,
    failed: AtomicU64,
}

/// Runs submitted jobs with bounded concurrency and collects their errors.
///
/// Must be created inside a Tokio runtime. Share it with `Arc` to submit from
/// several tasks; every method takes `&self`.
pub struct JobManager {
    queue_tx: mpsc::UnboundedSender<QueuedJob>,
    runtime: Arc<JobRuntime>,
    next_job_seq: AtomicU64,
    max_capacity: Option<usize>,
}

impl JobManager {
    /// Start the manager bound to the root cancellation token `ctx`.
    ///
    /// Every job receives a child of `ctx`; cancelling `ctx` asks running and
    /// queued jobs to stop but never aborts them.
    #[must_use]
    pub fn new(ctx: CancellationToken, mut config: JobManagerConfig) -> Self {
        config.max_capacity = config.max_capacity.map(|capacity| capacity.max(1));
        config.error_cache_capacity = config.error_cache_capacity.max(1);

        let (queue_tx, queue_rx) = mpsc::unbounded_channel::<QueuedJob>();
        let runtime = Arc::new(JobRuntime {
            errors: ErrorCache::new(config.error_cache_capacity),
            tracker: CompletionTracker::new(),
            running: AtomicUsize::new(0),
            finished: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        });

        match config.max_capacity {
            Some(workers) => runtime.spawn_worker_pool(queue_rx, ctx, workers),
            None => runtime.spawn_dispatch_loop(queue_rx, ctx),
        }

        Self {
            queue_tx,
            runtime,
            next_job_seq: AtomicU64::new(0),
            max_capacity: config.max_capacity,
        }
    }

    /// Start with default config (unbounded capacity, 100 retained errors).
    #[must_use]
    pub fn with_defaults(ctx: CancellationToken) -> Self {
        Self::new(ctx, JobManagerConfig::default())
    }

    /// Submit one job. Never blocks and never rejects.
    pub fn add_job<J>(&self, job: J)
    where
        J: Job + 'static,
    {
        self.add_boxed_job(Box::new(job));
    }

    /// Submit an already boxed job.
    pub fn add_boxed_job(&self, job: BoxedJob) {
        let seq = self.next_job_seq.fetch_add(1, Ordering::Relaxed);
        if self.runtime.tracker.begin() && seq > 0 {
            tracing::debug!(seq, "job manager rearmed after previous completion");
        }

        if let Err(mpsc::error::SendError(queued)) = self.queue_tx.send(QueuedJob { seq, job }) {
            // Only reachable once the runtime has shut down and dropped the workers.
            tracing::warn!(seq = queued.seq, "job queue is closed; job not executed");
            self.runtime.complete(
                queued.seq,
                Err(anyhow::anyhow!("job {} not executed: queue is closed", queued.seq)),
            );
        }
    }

    /// Snapshot of retained job errors, oldest first.
    #[must_use]
    pub fn errs(&self) -> Vec<JobError> {
        self.runtime.errors.snapshot()
    }

    /// Signal that fires once no submitted job is queued or running.
    #[must_use]
    pub fn done(&self) -> Done {
        self.runtime.tracker.done()
    }

    /// Configured concurrency bound after clamping.
    #[must_use]
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }
}

impl JobRuntime {
    /// Record the outcome, then release the job from the outstanding count.
    fn complete(&self, seq: u64, outcome: anyhow::Result<()>) {
        if self.errors.record_outcome(outcome) {
            self.failed.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(seq, "job finished with error");
        } else {
            tracing::trace!(seq, "job finished");
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        self.tracker.finish();
    }
}
