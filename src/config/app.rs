//! Application-level configuration: world layout, runner options, and env loading.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{RetryConfig, SchedulerConfig};

/// Initial world layout used when seeding the entity population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Map width in cells.
    pub width: u32,
    /// Map height in cells.
    pub height: u32,
    /// Number of entities to place.
    pub population: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            population: 20_000,
        }
    }
}

impl WorldConfig {
    /// Number of cells on the map.
    #[must_use]
    pub const fn cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Validate world values.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be greater than 0".into());
        }
        if self.population as u64 > self.cells() {
            return Err(format!(
                "population ({}) does not fit a {}x{} map",
                self.population, self.width, self.height
            ));
        }
        Ok(())
    }
}

/// Runner bootstrap options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Worker threads for the dedicated scheduler runtime.
    pub worker_threads: usize,
    /// Dispatch task cycles at boot. When false, entities are loaded but left idle.
    pub assign_on_boot: bool,
    /// JSON-lines task log file; in-memory when absent.
    pub task_log_path: Option<PathBuf>,
    /// File receiving the operational trace; stderr only when absent.
    pub trace_path: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            assign_on_boot: true,
            task_log_path: None,
            trace_path: None,
        }
    }
}

impl RunnerConfig {
    /// Validate runner values.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_threads == 0 {
            return Err("worker_threads must be greater than 0".into());
        }
        Ok(())
    }
}

/// Visible-area settings for entity views and the area watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Visible area width in cells.
    pub area_width: u32,
    /// Visible area height in cells.
    pub area_height: u32,
    /// Delay between area watcher sweeps, in milliseconds.
    pub log_interval_ms: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            area_width: 32,
            area_height: 32,
            log_interval_ms: 1_000,
        }
    }
}

impl VisionConfig {
    /// Validate vision values.
    pub fn validate(&self) -> Result<(), String> {
        if self.log_interval_ms == 0 {
            return Err("log_interval_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Sweep interval as a [`Duration`].
    #[must_use]
    pub const fn log_interval(&self) -> Duration {
        Duration::from_millis(self.log_interval_ms)
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Task-cycle settings.
    pub scheduler: SchedulerConfig,
    /// World seeding settings.
    pub world: WorldConfig,
    /// Runner settings.
    pub runner: RunnerConfig,
    /// Visible-area settings.
    pub vision: VisionConfig,
}

impl AppConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), String> {
        self.scheduler
            .validate()
            .map_err(|e| format!("scheduler invalid: {e}"))?;
        self.world
            .validate()
            .map_err(|e| format!("world invalid: {e}"))?;
        self.runner
            .validate()
            .map_err(|e| format!("runner invalid: {e}"))?;
        self.vision
            .validate()
            .map_err(|e| format!("vision invalid: {e}"))
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from environment variables, loading `.env` first.
    ///
    /// Unset variables fall back to defaults; unparsable values are errors.
    pub fn from_env() -> Result<Self, String> {
        load_dotenv();
        let defaults = Self::default();
        let retry_defaults = RetryConfig::default();

        let cfg = Self {
            scheduler: SchedulerConfig {
                min_task_duration_secs: env_parse(
                    "TASK_MIN_DURATION_SECS",
                    defaults.scheduler.min_task_duration_secs,
                )?,
                max_task_duration_secs: env_parse(
                    "TASK_MAX_DURATION_SECS",
                    defaults.scheduler.max_task_duration_secs,
                )?,
                max_tasks_per_cycle: env_parse(
                    "TASK_MAX_PER_CYCLE",
                    defaults.scheduler.max_tasks_per_cycle,
                )?,
                poll_interval_ms: env_parse(
                    "TASK_POLL_INTERVAL_MS",
                    defaults.scheduler.poll_interval_ms,
                )?,
                retry: RetryConfig {
                    max_retries: env_parse("TASK_RETRY_MAX", retry_defaults.max_retries)?,
                    initial_backoff_ms: env_parse(
                        "TASK_RETRY_INITIAL_MS",
                        retry_defaults.initial_backoff_ms,
                    )?,
                    max_backoff_ms: env_parse("TASK_RETRY_MAX_MS", retry_defaults.max_backoff_ms)?,
                    jitter_factor: env_parse("TASK_RETRY_JITTER", retry_defaults.jitter_factor)?,
                },
            },
            world: WorldConfig {
                width: env_parse("WORLD_WIDTH", defaults.world.width)?,
                height: env_parse("WORLD_HEIGHT", defaults.world.height)?,
                population: env_parse("WORLD_POPULATION", defaults.world.population)?,
            },
            runner: RunnerConfig {
                worker_threads: env_parse("RUNNER_WORKER_THREADS", defaults.runner.worker_threads)?,
                assign_on_boot: env_parse("RUNNER_ASSIGN_ON_BOOT", defaults.runner.assign_on_boot)?,
                task_log_path: env_opt("RUNNER_TASK_LOG_PATH").map(PathBuf::from),
                trace_path: env_opt("RUNNER_TRACE_PATH").map(PathBuf::from),
            },
            vision: VisionConfig {
                area_width: env_parse("VISION_AREA_WIDTH", defaults.vision.area_width)?,
                area_height: env_parse("VISION_AREA_HEIGHT", defaults.vision.area_height)?,
                log_interval_ms: env_parse(
                    "VISION_LOG_INTERVAL_MS",
                    defaults.vision.log_interval_ms,
                )?,
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn env_parse<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| format!("{key}={raw:?} is not valid: {e}"))
    })
}
