//! In-memory task log.

use parking_lot::Mutex;

use crate::core::{EntityId, SchedulerError, TaskLog, TaskLogEntry};

/// Append-only task log kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryTaskLog {
    entries: Mutex<Vec<TaskLogEntry>>,
}

impl InMemoryTaskLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<TaskLogEntry> {
        self.entries.lock().clone()
    }

    /// Snapshot of the entries for one entity in append order.
    #[must_use]
    pub fn entries_for(&self, id: &EntityId) -> Vec<TaskLogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.entity_id == *id)
            .cloned()
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl TaskLog for InMemoryTaskLog {
    fn append(&self, entry: TaskLogEntry) -> Result<(), SchedulerError> {
        self.entries.lock().push(entry);
        Ok(())
    }
}
