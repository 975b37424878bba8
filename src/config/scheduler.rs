//! Scheduler and retry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Smallest allowed value for `max_tasks_per_cycle`; also the per-cycle minimum.
pub const MIN_TASKS_PER_CYCLE: usize = 2;

/// Backoff policy for store and log calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Down-jitter fraction in `[0, 1]` (0.25 = delays shortened by up to 25%).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 5_000,
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Validate retry values.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err("jitter_factor must be within [0, 1]".into());
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err("initial_backoff_ms must not exceed max_backoff_ms".into());
        }
        Ok(())
    }
}

/// Task-cycle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Shortest task duration, in whole seconds.
    pub min_task_duration_secs: u64,
    /// Longest task duration, in whole seconds.
    pub max_task_duration_secs: u64,
    /// Upper bound of tasks dispatched per cycle (lower bound is fixed at 2).
    pub max_tasks_per_cycle: usize,
    /// Cancellation and idle-hold polling granularity, in milliseconds.
    pub poll_interval_ms: u64,
    /// Backoff policy for store and log calls.
    pub retry: RetryConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_task_duration_secs: 10,
            max_task_duration_secs: 600,
            max_tasks_per_cycle: 4,
            poll_interval_ms: 1_000,
            retry: RetryConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Validate scheduler configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_task_duration_secs > self.max_task_duration_secs {
            return Err(format!(
                "min_task_duration_secs ({}) must not exceed max_task_duration_secs ({})",
                self.min_task_duration_secs, self.max_task_duration_secs
            ));
        }
        if self.max_tasks_per_cycle < MIN_TASKS_PER_CYCLE {
            return Err(format!(
                "max_tasks_per_cycle must be at least {MIN_TASKS_PER_CYCLE}"
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".into());
        }
        self.retry
            .validate()
            .map_err(|e| format!("retry invalid: {e}"))
    }

    /// Poll interval as a `Duration`.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
