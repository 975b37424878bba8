//! Operational trace lines for task transitions and area sweeps.
//!
//! Task lines are emitted on the [`TRACE_TARGET`] target and area sweeps on
//! [`VISION_TARGET`], so a subscriber can route them to their own file (see
//! [`crate::util::telemetry::init_tracing_with_trace_file`]).

use std::time::Duration;

use super::{Entity, EntityHandle, TaskLabel};

/// Tracing target carrying the human-readable task trace.
pub const TRACE_TARGET: &str = "task_trace";

/// Tracing target carrying area watcher sweeps.
pub const VISION_TARGET: &str = "visible_area";

/// `Entity[x,y] task-N started, finishes in D s`
#[must_use]
pub fn started_line(entity: EntityHandle, label: &TaskLabel, duration: Duration) -> String {
    format!(
        "Entity{} {label} started, finishes in {} s",
        entity.position,
        duration.as_secs()
    )
}

/// `Entity[x,y] task-N finished`
#[must_use]
pub fn finished_line(entity: EntityHandle, label: &TaskLabel) -> String {
    format!("Entity{} {label} finished", entity.position)
}

/// `Entity[x,y] task-1, timeLeft 09m:58s; task-2, timeLeft 00m:03s;`
///
/// Active tasks are listed in label order. Deadlines already passed show `00m:00s`.
#[must_use]
pub fn area_line(entity: &Entity, now_ms: u128) -> String {
    let mut tasks: Vec<(&TaskLabel, &u128)> = entity.active_tasks.iter().collect();
    tasks.sort();

    let mut line = format!("Entity{}", entity.position);
    for (label, deadline_ms) in tasks {
        let secs = deadline_ms.saturating_sub(now_ms) / 1_000;
        line.push_str(&format!(
            " {label}, timeLeft {:02}m:{:02}s;",
            secs / 60,
            secs % 60
        ));
    }
    line
}

pub(crate) fn trace_started(entity: EntityHandle, label: &TaskLabel, duration: Duration) {
    tracing::info!(
        target: TRACE_TARGET,
        entity = %entity.id,
        "{}",
        started_line(entity, label, duration)
    );
}

pub(crate) fn trace_finished(entity: EntityHandle, label: &TaskLabel) {
    tracing::info!(
        target: TRACE_TARGET,
        entity = %entity.id,
        "{}",
        finished_line(entity, label)
    );
}
