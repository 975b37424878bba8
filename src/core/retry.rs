//! Retry with exponential backoff for store and log calls.
//!
//! - Delay before retry `n` (0-based): `initial_backoff * 2^n`, capped at `max_backoff`
//! - Down-jitter: delay multiplied by a random factor in `[1 - jitter_factor, 1.0]`
//! - Only errors with [`SchedulerError::is_retryable`] are retried
//!
//! The operation itself is synchronous; the routine only suspends between attempts.

use std::time::Duration;

use crate::config::RetryConfig;
use crate::core::SchedulerError;

/// Backoff delay before retry number `backoff_step` (0 before the first retry).
#[must_use]
pub fn backoff_delay(backoff_step: u32, config: &RetryConfig) -> Duration {
    let exponent = i32::try_from(backoff_step).unwrap_or(i32::MAX);
    let base = Duration::from_millis(config.initial_backoff_ms).as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(Duration::from_millis(config.max_backoff_ms).as_secs_f64());

    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

/// Run `op` until it succeeds, fails with a non-retryable error, or retries run out.
///
/// Exhaustion is reported as [`SchedulerError::RetriesExhausted`] wrapping the last
/// error.
pub async fn with_retry<T, F>(
    config: &RetryConfig,
    operation: &'static str,
    mut op: F,
) -> Result<T, SchedulerError>
where
    F: FnMut() -> Result<T, SchedulerError>,
{
    let mut attempt: u32 = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if attempt >= config.max_retries => {
                return Err(SchedulerError::RetriesExhausted {
                    operation,
                    attempts: attempt + 1,
                    source: Box::new(err),
                });
            }
            Err(err) => {
                let delay = backoff_delay(attempt, config);
                tracing::warn!(
                    operation,
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "retrying after failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 1_000,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let cfg = no_jitter();
        assert_eq!(backoff_delay(0, &cfg), Duration::from_millis(100));
        assert_eq!(backoff_delay(1, &cfg), Duration::from_millis(200));
        assert_eq!(backoff_delay(3, &cfg), Duration::from_millis(800));
        assert_eq!(backoff_delay(4, &cfg), Duration::from_millis(1_000));
        assert_eq!(backoff_delay(40, &cfg), Duration::from_millis(1_000));
    }

    #[test]
    fn test_backoff_jitter_only_shortens() {
        let cfg = RetryConfig {
            jitter_factor: 0.25,
            ..no_jitter()
        };
        for _ in 0..100 {
            let d = backoff_delay(1, &cfg);
            assert!(d <= Duration::from_millis(200));
            assert!(d >= Duration::from_millis(150));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let mut calls = 0;
        let result = with_retry(&no_jitter(), "flaky", || {
            calls += 1;
            if calls < 3 {
                Err(SchedulerError::Store("transient".into()))
            } else {
                Ok(calls)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_wraps_last_error() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&no_jitter(), "always_down", || {
            calls += 1;
            Err(SchedulerError::Log("down".into()))
        })
        .await;
        assert_eq!(calls, 4);
        match result {
            Err(SchedulerError::RetriesExhausted {
                operation,
                attempts,
                source,
            }) => {
                assert_eq!(operation, "always_down");
                assert_eq!(attempts, 4);
                assert!(matches!(*source, SchedulerError::Log(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_fast() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&no_jitter(), "lookup", || {
            calls += 1;
            Err(SchedulerError::InvalidConfig("nope".into()))
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
    }
}
