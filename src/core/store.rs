//! Entity store port.

use super::{Area, Entity, EntityId, SchedulerError, TaskLabel};

/// Record-per-entity storage with per-field updates.
///
/// Each call is treated as a single atomic record operation. Calls are synchronous:
/// the scheduler never suspends in the middle of a write.
pub trait EntityStore: Send + Sync {
    /// Load every entity.
    fn load_all(&self) -> Result<Vec<Entity>, SchedulerError>;

    /// Record `label` as active with the given absolute deadline (ms since epoch).
    fn set_active_task(
        &self,
        id: &EntityId,
        label: &TaskLabel,
        deadline_ms: u128,
    ) -> Result<(), SchedulerError>;

    /// Remove `label` from the entity's active tasks.
    fn clear_active_task(&self, id: &EntityId, label: &TaskLabel) -> Result<(), SchedulerError>;
}

/// Read-only lookups used by the control surface and the area watcher.
///
/// Never touches task state.
pub trait EntityQuery: Send + Sync {
    /// One entity record, if present.
    fn entity(&self, id: &EntityId) -> Option<Entity>;

    /// Every entity positioned inside `area`.
    fn entities_in(&self, area: &Area) -> Vec<Entity>;
}
