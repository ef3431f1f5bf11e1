use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::manager::types::QueuedJob;

use super::JobRuntime;

impl JobRuntime {
    /// Fixed pool of `workers` long-lived tasks sharing one queue.
    ///
    /// Each worker runs one job to completion before taking the next, so at
    /// most `workers` jobs execute at any time.
    pub(super) fn spawn_worker_pool(
        self: &Arc<Self>,
        queue_rx: mpsc::UnboundedReceiver<QueuedJob>,
        root: CancellationToken,
        workers: usize,
    ) {
        let queue_rx = Arc::new(Mutex::new(queue_rx));
        for worker_id in 0..workers {
            let runtime = Arc::clone(self);
            let queue_rx = Arc::clone(&queue_rx);
            let root = root.clone();
            tokio::spawn(async move {
                tracing::trace!(worker_id, "job worker started");
                loop {
                    let next = queue_rx.lock().await.recv().await;
                    let Some(job) = next else {
                        break;
                    };
                    runtime.process_job(job, &root).await;
                }
                tracing::trace!(worker_id, "job worker stopped");
            });
        }
        tracing::debug!(workers, "job worker pool started");
    }

    /// Unbounded mode: every dequeued job starts right away.
    pub(super) fn spawn_dispatch_loop(
        self: &Arc<Self>,
        mut queue_rx: mpsc::UnboundedReceiver<QueuedJob>,
        root: CancellationToken,
    ) {
        let runtime = Arc::clone(self);
        tokio::spawn(async move {
            let mut workers = JoinSet::new();

            while let Some(job) = queue_rx.recv().await {
                let worker_runtime = Arc::clone(&runtime);
                let worker_root = root.clone();
                workers.spawn(async move {
                    worker_runtime.process_job(job, &worker_root).await;
                });

                while let Some(result) = workers.try_join_next() {
                    if let Err(error) = result {
                        tracing::error!("job worker crashed: {error}");
                    }
                }
            }

            while let Some(result) = workers.join_next().await {
                if let Err(error) = result {
                    tracing::error!("job worker crashed: {error}");
                }
            }
            tracing::debug!("job dispatch loop stopped");
        });
        tracing::debug!("job dispatch loop started (unbounded capacity)");
    }

    async fn process_job(&self, queued: QueuedJob, root: &CancellationToken) {
        let QueuedJob { seq, job } = queued;
        let ctx = root.child_token();
        self.running.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(seq, "job started");

        // Run on its own task so a panicking job still finishes its slot.
        let outcome = match tokio::spawn(async move { job.run(ctx).await }).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(seq, "job crashed: {error}");
                Err(anyhow::anyhow!("job {seq} did not complete: {error}"))
            }
        };

        self.running.fetch_sub(1, Ordering::SeqCst);
        self.complete(seq, outcome);
    }
}
