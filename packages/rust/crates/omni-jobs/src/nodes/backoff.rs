use std::time::Duration;

use omni_jobs::BackOff;

use crate::cli::BackOffStrategy;

pub(crate) fn run_backoff_mode(
    strategy: BackOffStrategy,
    min_millis: u64,
    retries: u32,
) -> anyhow::Result<()> {
    let min = Duration::from_millis(min_millis);
    let backoff = match strategy {
        BackOffStrategy::Exponential => BackOff::exponential(min),
        BackOffStrategy::Linear => BackOff::linear(min),
    };
    for retry in 0..retries {
        println!("retry={retry} delay_ms={}", backoff.delay(retry).as_millis());
    }
    Ok(())
}
