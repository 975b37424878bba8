//! Configuration models for the scheduler, world generation, and the runner.

pub mod app;
pub mod scheduler;

pub use app::{AppConfig, RunnerConfig, VisionConfig, WorldConfig};
pub use scheduler::{RetryConfig, SchedulerConfig};
