//! In-memory entity store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{Area, Entity, EntityId, EntityQuery, EntityStore, SchedulerError, TaskLabel};

/// Entity store held in process memory, for development, tests, and the demo binary.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: RwLock<HashMap<EntityId, Entity>>,
}

impl InMemoryEntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `entities`.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let store = Self::new();
        store.insert_all(entities);
        store
    }

    /// Insert or replace one entity.
    pub fn insert(&self, entity: Entity) {
        self.entities.write().insert(entity.id, entity);
    }

    /// Insert or replace many entities.
    pub fn insert_all(&self, entities: impl IntoIterator<Item = Entity>) {
        let mut map = self.entities.write();
        for entity in entities {
            map.insert(entity.id, entity);
        }
    }

    /// Copy of one entity record.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<Entity> {
        self.entities.read().get(id).cloned()
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Entities whose position lies inside `area`. Read-only.
    #[must_use]
    pub fn find_in_area(&self, area: &Area) -> Vec<Entity> {
        self.entities
            .read()
            .values()
            .filter(|e| area.contains(e.position))
            .cloned()
            .collect()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn load_all(&self) -> Result<Vec<Entity>, SchedulerError> {
        Ok(self.entities.read().values().cloned().collect())
    }

    fn set_active_task(
        &self,
        id: &EntityId,
        label: &TaskLabel,
        deadline_ms: u128,
    ) -> Result<(), SchedulerError> {
        let mut map = self.entities.write();
        let entity = map.get_mut(id).ok_or(SchedulerError::UnknownEntity(*id))?;
        entity.active_tasks.insert(label.clone(), deadline_ms);
        Ok(())
    }

    fn clear_active_task(&self, id: &EntityId, label: &TaskLabel) -> Result<(), SchedulerError> {
        let mut map = self.entities.write();
        let entity = map.get_mut(id).ok_or(SchedulerError::UnknownEntity(*id))?;
        entity.active_tasks.remove(label);
        Ok(())
    }
}

impl EntityQuery for InMemoryEntityStore {
    fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.get(id)
    }

    fn entities_in(&self, area: &Area) -> Vec<Entity> {
        self.find_in_area(area)
    }
}
