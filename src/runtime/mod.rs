//! Runner bootstrap, the area watcher, and the control API surface.

pub mod api;
pub mod runner;
pub mod vision;

pub use api::{
    area_center, entity_view, health, set_run_state, snapshot, AreaWatchResponse, EntityView,
    Health, RunStateRequest, RunStateResponse, SchedulerSnapshot,
};
pub use runner::{Runner, RunnerHandle};
pub use vision::{sweep_lines, AreaWatcher};
