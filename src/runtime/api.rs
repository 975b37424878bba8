//! API-facing request/response models for the control surface.
//!
//! The transport, whether an HTTP server or a command line, is left to the caller.
//! These types and functions give it a serializable shape and translate control
//! outcomes into responses.

use serde::{Deserialize, Serialize};

use crate::config::{SchedulerConfig, VisionConfig, WorldConfig};
use crate::core::{
    Area, ControlChannel, Entity, EntityId, EntityQuery, Position, RunStateChange,
    SchedulerError,
};

/// Request to halt or resume an entity's task cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStateRequest {
    /// Target entity.
    pub entity_id: EntityId,
    /// `true` resumes, `false` halts.
    pub running: bool,
}

impl RunStateRequest {
    /// Build a request from loosely typed query parameters.
    ///
    /// `control` follows the integer-flag convention: absent or non-zero resumes,
    /// zero halts.
    pub fn from_query(entity_id: &str, control: Option<i64>) -> Result<Self, String> {
        let entity_id = entity_id
            .parse()
            .map_err(|_| format!("wrong entity_id: {entity_id:?}"))?;
        Ok(Self {
            entity_id,
            running: control.unwrap_or(1) != 0,
        })
    }
}

/// Response to a [`RunStateRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStateResponse {
    /// Target entity.
    pub entity_id: EntityId,
    /// Requested state.
    pub running: bool,
    /// What the control channel did.
    pub outcome: RunStateChange,
}

impl RunStateResponse {
    /// Whether the request referred to a known entity.
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.outcome != RunStateChange::Ignored
    }
}

/// Apply a run-state request to the control channel.
pub fn set_run_state(control: &ControlChannel, req: RunStateRequest) -> RunStateResponse {
    let outcome = control.set_run_state(&req.entity_id, req.running);
    RunStateResponse {
        entity_id: req.entity_id,
        running: req.running,
        outcome,
    }
}

/// Centre for a visible area: `requested` when it lies on the map, `fallback` otherwise.
///
/// Map bounds are `0..=width` and `0..=height`.
#[must_use]
pub fn area_center(requested: Option<Position>, fallback: Position, world: &WorldConfig) -> Position {
    requested
        .filter(|p| {
            (0..=i64::from(world.width)).contains(&p.x)
                && (0..=i64::from(world.height)).contains(&p.y)
        })
        .unwrap_or(fallback)
}

/// One entity together with the other entities inside its visible area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    /// The requested entity.
    pub entity: Entity,
    /// Centre of the visible area.
    pub center: Position,
    /// Visible area edges.
    pub area: Area,
    /// Entities inside the area, excluding `entity`, ordered by position.
    pub visible: Vec<Entity>,
}

/// Look up one entity and its visible neighbours.
///
/// The area is centred on `requested` when it lies on the map, and on the entity
/// itself otherwise.
///
/// # Errors
///
/// [`SchedulerError::UnknownEntity`] when `id` is not in the store.
pub fn entity_view<Q: EntityQuery + ?Sized>(
    store: &Q,
    id: &EntityId,
    requested: Option<Position>,
    world: &WorldConfig,
    vision: &VisionConfig,
) -> Result<EntityView, SchedulerError> {
    let entity = store.entity(id).ok_or(SchedulerError::UnknownEntity(*id))?;
    let center = area_center(requested, entity.position, world);
    let area = Area::around(center, vision.area_width, vision.area_height);

    let mut visible: Vec<Entity> = store
        .entities_in(&area)
        .into_iter()
        .filter(|e| e.id != entity.id)
        .collect();
    visible.sort_by_key(|e| (e.position.x, e.position.y));

    Ok(EntityView {
        entity,
        center,
        area,
        visible,
    })
}

/// Response to starting or stopping the area watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaWatchResponse {
    /// Entity whose area is watched; absent on stop.
    pub entity_id: Option<EntityId>,
    /// Centre of the watched area; absent on stop.
    pub center: Option<Position>,
    /// Whether a watch is running after the request.
    pub watching: bool,
}

/// Configuration and halt-set summary for status pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    /// Shortest task duration (s).
    pub min_task_duration_secs: u64,
    /// Longest task duration (s).
    pub max_task_duration_secs: u64,
    /// Maximum tasks per cycle.
    pub max_tasks_per_cycle: usize,
    /// Poll interval (ms).
    pub poll_interval_ms: u64,
    /// Entities currently halted.
    pub halted_entities: usize,
}

/// Summarize configuration and the current halt set.
#[must_use]
pub fn snapshot(cfg: &SchedulerConfig, control: &ControlChannel) -> SchedulerSnapshot {
    SchedulerSnapshot {
        min_task_duration_secs: cfg.min_task_duration_secs,
        max_task_duration_secs: cfg.max_task_duration_secs,
        max_tasks_per_cycle: cfg.max_tasks_per_cycle,
        poll_interval_ms: cfg.poll_interval_ms,
        halted_entities: control.halted().len(),
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Return a health payload.
#[must_use]
pub const fn health() -> Health {
    Health { ok: true }
}
