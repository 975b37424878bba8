//! Control channel: the shared halt set consulted by every task and cycle.
//!
//! Writers are control-surface threads; readers are every polling task routine.
//! A single `parking_lot::RwLock` guards both the registry of known entities and the
//! halt set, so a toggle is never lost and a reader never sees a half-applied update.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Result of a `set_run_state` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStateChange {
    /// Entity was running and is now halted.
    Halted,
    /// Entity was halted and is now running.
    Resumed,
    /// Entity was already in the requested state.
    Unchanged,
    /// Entity id is not known to the scheduler; nothing changed.
    Ignored,
}

#[derive(Debug, Default)]
struct ControlState {
    known: HashSet<EntityId>,
    halted: HashSet<EntityId>,
}

/// Concurrency-safe halt set shared between the control surface and the scheduler.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct ControlChannel {
    state: Arc<RwLock<ControlState>>,
}

impl ControlChannel {
    /// Empty channel with no registered entities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel that already knows the given entities.
    pub fn with_entities(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let channel = Self::new();
        channel.register(ids);
        channel
    }

    /// Register entity ids so that control requests for them are honoured.
    pub fn register(&self, ids: impl IntoIterator<Item = EntityId>) {
        let mut state = self.state.write();
        state.known.extend(ids);
    }

    /// Whether the id was registered.
    #[must_use]
    pub fn is_known(&self, id: &EntityId) -> bool {
        self.state.read().known.contains(id)
    }

    /// Halt (`running == false`) or resume (`running == true`) an entity.
    ///
    /// Both directions are idempotent. Unknown ids are ignored.
    pub fn set_run_state(&self, id: &EntityId, running: bool) -> RunStateChange {
        let mut state = self.state.write();
        if !state.known.contains(id) {
            drop(state);
            tracing::warn!(entity = %id, running, "run state change ignored: unknown entity");
            return RunStateChange::Ignored;
        }

        let change = if running {
            if state.halted.remove(id) {
                RunStateChange::Resumed
            } else {
                RunStateChange::Unchanged
            }
        } else if state.halted.insert(*id) {
            RunStateChange::Halted
        } else {
            RunStateChange::Unchanged
        };
        drop(state);

        tracing::info!(entity = %id, running, ?change, "run state updated");
        change
    }

    /// Membership test used by poll loops.
    #[must_use]
    pub fn is_halted(&self, id: &EntityId) -> bool {
        self.state.read().halted.contains(id)
    }

    /// Snapshot of currently halted ids.
    #[must_use]
    pub fn halted(&self) -> Vec<EntityId> {
        self.state.read().halted.iter().copied().collect()
    }
}
