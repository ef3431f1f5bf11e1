//! Retry-delay calculators for callers that wrap a failing job in retries.
//!
//! The job manager never retries on its own; a job that wants retries loops
//! internally and sleeps for [`BackOff::delay`] between attempts.

use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::error::JobsError;

/// Jitter range applied to every delay.
const JITTER_MIN: f64 = 0.5;
const JITTER_MAX: f64 = 1.5;

/// Back-off strategy with a floor of `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOff {
    /// `max(jitter * 2^retry * min, min)`.
    Exponential {
        /// Smallest delay ever returned.
        min: Duration,
    },
    /// `max(jitter * retry * min, min)`.
    Linear {
        /// Smallest delay ever returned.
        min: Duration,
    },
}

impl BackOff {
    /// Exponential back-off starting at `min`.
    #[must_use]
    pub fn exponential(min: Duration) -> Self {
        Self::Exponential { min }
    }

    /// Linear back-off starting at `min`.
    #[must_use]
    pub fn linear(min: Duration) -> Self {
        Self::Linear { min }
    }

    /// Delay before retry number `retry` (0-based), with random jitter in `[0.5, 1.5)`.
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(JITTER_MIN..JITTER_MAX);
        self.delay_with_jitter(retry, jitter)
    }

    /// Delay for an explicit jitter factor. Saturates at `Duration::MAX`.
    #[must_use]
    pub fn delay_with_jitter(&self, retry: u32, jitter: f64) -> Duration {
        let (min, factor) = match *self {
            Self::Exponential { min } => {
                let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
                (min, 2f64.powi(exponent))
            }
            Self::Linear { min } => (min, f64::from(retry)),
        };
        let scaled = jitter * factor * min.as_secs_f64();
        if scaled.is_nan() || scaled <= min.as_secs_f64() {
            return min;
        }
        Duration::try_from_secs_f64(scaled).unwrap_or(Duration::MAX)
    }
}

impl FromStr for BackOff {
    type Err = JobsError;

    /// Parse `exponential:<millis>` or `linear:<millis>`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (strategy, millis) = raw.trim().split_once(':').ok_or_else(|| {
            JobsError::InvalidConfig(format!("expected <strategy>:<millis>, got {raw:?}"))
        })?;
        let millis = millis.trim().parse::<u64>().map_err(|error| {
            JobsError::InvalidConfig(format!("invalid back-off millis {millis:?}: {error}"))
        })?;
        let min = Duration::from_millis(millis);
        match strategy.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" => Ok(Self::exponential(min)),
            "linear" => Ok(Self::linear(min)),
            other => Err(JobsError::InvalidConfig(format!(
                "unknown back-off strategy {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_millis(100);

    #[test]
    fn exponential_doubles_per_retry() {
        let backoff = BackOff::exponential(MIN);
        assert_eq!(backoff.delay_with_jitter(0, 1.0), MIN);
        assert_eq!(backoff.delay_with_jitter(1, 1.0), Duration::from_millis(200));
        assert_eq!(backoff.delay_with_jitter(3, 1.0), Duration::from_millis(800));
    }

    #[test]
    fn linear_grows_with_retry_count() {
        let backoff = BackOff::linear(MIN);
        assert_eq!(backoff.delay_with_jitter(0, 1.0), MIN);
        assert_eq!(backoff.delay_with_jitter(4, 1.0), Duration::from_millis(400));
    }

    #[test]
    fn never_below_minimum() {
        let backoff = BackOff::exponential(MIN);
        assert_eq!(backoff.delay_with_jitter(0, JITTER_MIN), MIN);
        for retry in 0..10 {
            assert!(backoff.delay(retry) >= MIN);
            assert!(BackOff::linear(MIN).delay(retry) >= MIN);
        }
    }

    #[test]
    fn huge_retry_saturates() {
        let backoff = BackOff::exponential(Duration::from_secs(1));
        assert_eq!(backoff.delay_with_jitter(u32::MAX, 1.0), Duration::MAX);
    }

    #[test]
    fn parses_strategy_strings() {
        assert_eq!(
            "exponential:250".parse::<BackOff>().expect("parse"),
            BackOff::exponential(Duration::from_millis(250))
        );
        assert_eq!(
            " Linear:10 ".parse::<BackOff>().expect("parse"),
            BackOff::linear(Duration::from_millis(10))
        );
        assert!("fibonacci:10".parse::<BackOff>().is_err());
        assert!("linear".parse::<BackOff>().is_err());
        assert!("linear:abc".parse::<BackOff>().is_err());
    }
}
