use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use omni_jobs::{JobManager, JobsSettings};

pub(crate) struct RunRequest {
    pub(crate) jobs: u64,
    pub(crate) max_capacity: Option<usize>,
    pub(crate) error_cache_capacity: Option<usize>,
    pub(crate) fail_every: Option<u64>,
    pub(crate) job_millis: u64,
    pub(crate) timeout_secs: Option<u64>,
}

pub(crate) async fn run_jobs_mode(
    request: RunRequest,
    settings: &JobsSettings,
) -> anyhow::Result<()> {
    let mut config = settings.to_manager_config();
    if let Some(max_capacity) = request.max_capacity {
        config = config.with_max_capacity(max_capacity);
    }
    if let Some(error_cache_capacity) = request.error_cache_capacity {
        config = config.with_error_cache_capacity(error_cache_capacity);
    }

    let root = CancellationToken::new();
    let manager = JobManager::new(root.clone(), config);
    let job_delay = Duration::from_millis(request.job_millis);

    tracing::info!(
        jobs = request.jobs,
        max_capacity = ?manager.max_capacity(),
        error_cache_capacity = config.error_cache_capacity,
        "submitting synthetic jobs"
    );
    for index in 0..request.jobs {
        let fails = request
            .fail_every
            .is_some_and(|every| every > 0 && (index + 1) % every == 0);
        manager.add_job(move |ctx: CancellationToken| async move {
            tokio::select! {
                () = tokio::time::sleep(job_delay) => {}
                () = ctx.cancelled() => anyhow::bail!("job {index} cancelled"),
            }
            if fails {
                anyhow::bail!("job {index} failed");
            }
            Ok(())
        });
    }

    let done = manager.done();
    tokio::select! {
        () = done.wait() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C; cancelling outstanding jobs");
            root.cancel();
            done.wait().await;
        }
        () = deadline(request.timeout_secs) => {
            tracing::warn!(
                timeout_secs = request.timeout_secs.unwrap_or_default(),
                outstanding = manager.metrics().outstanding,
                "run timed out; cancelling outstanding jobs"
            );
            root.cancel();
            done.wait().await;
        }
    }

    let errors: Vec<String> = manager.errs().iter().map(ToString::to_string).collect();
    let summary = json!({
        "metrics": manager.metrics(),
        "cancelled": root.is_cancelled(),
        "errors": errors,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn deadline(timeout_secs: Option<u64>) {
    match timeout_secs {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => std::future::pending::<()>().await,
    }
}
