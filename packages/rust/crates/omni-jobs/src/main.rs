//! omni-jobs CLI: drive the job manager with synthetic workloads.
//!
//! Settings come from `packages/conf/jobs.yaml` and the user config home;
//! CLI flags override them. Override the config home with `--conf <dir>`.
//!
//! Logging: set `RUST_LOG=omni_jobs=debug` (or `trace`) to see worker logs on stderr.

mod cli;
mod nodes;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_jobs::{load_jobs_settings, set_config_home_override};

use crate::cli::{Cli, Command};
use crate::nodes::{RunRequest, run_backoff_mode, run_jobs_mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_jobs=debug"
        } else {
            "omni_jobs=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = load_jobs_settings();

    match cli.command {
        Command::Run {
            jobs,
            max_capacity,
            error_cache_capacity,
            fail_every,
            job_millis,
            timeout_secs,
        } => {
            run_jobs_mode(
                RunRequest {
                    jobs,
                    max_capacity,
                    error_cache_capacity,
                    fail_every,
                    job_millis,
                    timeout_secs,
                },
                &settings,
            )
            .await
        }
        Command::Backoff {
            strategy,
            min_millis,
            retries,
        } => run_backoff_mode(strategy, min_millis, retries),
    }
}
