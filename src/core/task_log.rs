//! Task log entries and the append-only sink abstraction.

use serde::{Deserialize, Serialize};

use super::{EntityHandle, EntityId, Position, SchedulerError, TaskLabel};
use crate::util::clock::now_ms;

/// Lifecycle status recorded in the task log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task began; its deadline is in the store.
    Started,
    /// Task ended, by timer or by cancellation.
    Finished,
}

/// Immutable task log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLogEntry {
    /// Owning entity.
    pub entity_id: EntityId,
    /// Entity position when the entry was written.
    pub position: Position,
    /// Task label within its cycle.
    pub task: TaskLabel,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Wall-clock timestamp in milliseconds since epoch.
    pub created_at_ms: u128,
}

/// Append-only sink for task lifecycle events.
pub trait TaskLog: Send + Sync {
    /// Append one entry.
    fn append(&self, entry: TaskLogEntry) -> Result<(), SchedulerError>;
}

/// Build a log entry for `entity` stamped with the current wall-clock time.
#[must_use]
pub fn build_log_entry(entity: EntityHandle, task: &TaskLabel, status: TaskStatus) -> TaskLogEntry {
    TaskLogEntry {
        entity_id: entity.id,
        position: entity.position,
        task: task.clone(),
        status,
        created_at_ms: now_ms(),
    }
}
