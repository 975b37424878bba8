//! Core scheduling abstractions and the task-cycle engine.

pub mod control;
pub mod entity;
pub mod error;
pub mod retry;
pub mod scheduler;
pub mod store;
pub mod task_log;
pub mod trace;

pub use control::{ControlChannel, RunStateChange};
pub use entity::{Area, Entity, EntityHandle, EntityId, Position, TaskLabel};
pub use error::{AppResult, SchedulerError};
pub use retry::{backoff_delay, with_retry};
pub use scheduler::{CycleReport, Scheduler, TaskEnd, TaskReport};
pub use store::{EntityQuery, EntityStore};
pub use task_log::{build_log_entry, TaskLog, TaskLogEntry, TaskStatus};
