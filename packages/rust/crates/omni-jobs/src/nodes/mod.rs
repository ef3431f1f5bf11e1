mod backoff;
mod run;

pub(crate) use backoff::run_backoff_mode;
pub(crate) use run::{RunRequest, run_jobs_mode};
