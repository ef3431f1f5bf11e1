//! Job manager: capacity-gated worker pool, error cache, completion signal.

mod core;
mod types;

pub use self::core::JobManager;
pub use types::{JobManagerConfig, JobMetricsSnapshot};
