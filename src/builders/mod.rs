//! Builders that validate configuration and assemble scheduler components.

pub mod scheduler_builder;

pub use scheduler_builder::{build_scheduler, SchedulerBuilder};
