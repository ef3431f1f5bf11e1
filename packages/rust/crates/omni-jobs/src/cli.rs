use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "omni-jobs")]
#[command(about = "Bounded-concurrency job manager: run synthetic workloads or inspect back-off delays.")]
pub(crate) struct Cli {
    /// Override config directory (same semantics as Python `--conf`).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging for omni_jobs (RUST_LOG still wins).
    #[arg(long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum BackOffStrategy {
    Exponential,
    Linear,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Submit synthetic jobs, wait for completion, print a JSON summary.
    Run {
        /// Number of jobs to submit.
        #[arg(long, default_value_t = 10)]
        jobs: u64,

        /// Max concurrently running jobs (default: settings file, else unbounded)
        #[arg(long)]
        max_capacity: Option<usize>,

        /// Retained errors (default: settings file, else 100)
        #[arg(long)]
        error_cache_capacity: Option<usize>,

        /// Make every N-th job fail.
        #[arg(long)]
        fail_every: Option<u64>,

        /// Sleep per job in milliseconds.
        #[arg(long, default_value_t = 100)]
        job_millis: u64,

        /// Cancel the root context after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Print retry delays for a back-off strategy.
    Backoff {
        /// Back-off strategy.
        #[arg(long, value_enum, default_value_t = BackOffStrategy::Exponential)]
        strategy: BackOffStrategy,

        /// Minimum delay in milliseconds.
        #[arg(long, default_value_t = 100)]
        min_millis: u64,

        /// Number of retries to print.
        #[arg(long, default_value_t = 5)]
        retries: u32,
    },
}
