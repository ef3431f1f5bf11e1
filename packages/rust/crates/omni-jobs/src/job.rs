//! Job abstraction: one async unit of work driven by a cancellation token.

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Async job so the manager can run closures or dedicated types.
///
/// Jobs are expected to observe `ctx` (poll `is_cancelled` or await
/// `cancelled()`) and return promptly once it fires. The manager never aborts
/// a running job.
#[async_trait]
pub trait Job: Send + Sync {
    /// Execute once; `Err` is recorded in the manager's error cache.
    async fn run(&self, ctx: CancellationToken) -> Result<()>;
}

#[async_trait]
impl<F, Fut> Job for F
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn run(&self, ctx: CancellationToken) -> Result<()> {
        (self)(ctx).await
    }
}

/// Type-erased job as stored in the queue.
pub type BoxedJob = Box<dyn Job + 'static>;
