//! Task-cycle engine.
//!
//! Every entity runs one perpetual loop of *cycles*. A cycle draws a task count
//! `N ∈ [2, max_tasks_per_cycle]`, spawns `N` tasks into a [`JoinSet`], and joins all
//! of them before idling (while halted) and starting over. Each task:
//!
//! 1. draws its duration once and computes the absolute deadline,
//! 2. writes the deadline to the store and appends `started` to the log,
//! 3. sleeps in poll-interval steps until the duration is used up or the entity is
//!    halted,
//! 4. clears the deadline and appends `finished`.
//!
//! Store and log calls go through [`with_retry`]. A task that still fails is
//! abandoned and reported; its siblings and all other entities are unaffected.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::scheduler::MIN_TASKS_PER_CYCLE;
use crate::config::SchedulerConfig;
use crate::core::trace::{trace_finished, trace_started};
use crate::core::{
    build_log_entry, with_retry, ControlChannel, Entity, EntityHandle, EntityId, EntityStore,
    SchedulerError, TaskLabel, TaskLog, TaskStatus,
};
use crate::util::clock::now_ms;

/// Why a task stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEnd {
    /// The full duration elapsed.
    Elapsed,
    /// The entity was found in the halt set at a poll tick.
    Halted,
}

/// Summary of one completed task routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Label within the cycle.
    pub label: TaskLabel,
    /// Duration drawn at start.
    pub duration: Duration,
    /// Deadline written to the store (ms since epoch).
    pub deadline_ms: u128,
    /// How the wait ended.
    pub ended_by: TaskEnd,
}

/// Summary of one joined cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Number of tasks dispatched.
    pub dispatched: usize,
    /// Tasks that ran to their finish step.
    pub completed: Vec<TaskReport>,
    /// Tasks abandoned after a store/log failure or a panic.
    pub failed: usize,
}

struct SchedulerInner<S, L> {
    config: SchedulerConfig,
    store: Arc<S>,
    log: Arc<L>,
    control: ControlChannel,
    rng: Mutex<StdRng>,
}

/// Per-entity perpetual task-cycle scheduler.
///
/// Cloning is cheap and shares the store, log, control channel, and random source.
pub struct Scheduler<S, L> {
    inner: Arc<SchedulerInner<S, L>>,
}

impl<S, L> Clone for Scheduler<S, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, L> Scheduler<S, L>
where
    S: EntityStore + 'static,
    L: TaskLog + 'static,
{
    /// Create a scheduler with an OS-seeded random source.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] when the configuration does not validate.
    pub fn new(
        config: SchedulerConfig,
        store: Arc<S>,
        log: Arc<L>,
        control: ControlChannel,
    ) -> Result<Self, SchedulerError> {
        Self::with_rng(config, store, log, control, StdRng::from_os_rng())
    }

    /// Create a scheduler with an explicit random source.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] when the configuration does not validate.
    pub fn with_rng(
        config: SchedulerConfig,
        store: Arc<S>,
        log: Arc<L>,
        control: ControlChannel,
        rng: StdRng,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        Ok(Self {
            inner: Arc::new(SchedulerInner {
                config,
                store,
                log,
                control,
                rng: Mutex::new(rng),
            }),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Shared control channel.
    #[must_use]
    pub fn control(&self) -> &ControlChannel {
        &self.inner.control
    }

    /// Draw the number of tasks for a cycle, uniformly from `[2, max_tasks_per_cycle]`.
    pub fn draw_task_count(&self) -> usize {
        let max = self.inner.config.max_tasks_per_cycle;
        self.inner.rng.lock().random_range(MIN_TASKS_PER_CYCLE..=max)
    }

    /// Draw a task duration in whole seconds, uniformly from the configured range.
    pub fn draw_duration(&self) -> Duration {
        let cfg = &self.inner.config;
        let secs = self
            .inner
            .rng
            .lock()
            .random_range(cfg.min_task_duration_secs..=cfg.max_task_duration_secs);
        Duration::from_secs(secs)
    }

    /// Launch one perpetual cycle per entity and wait on all of them.
    ///
    /// Cycles never end on their own, so this only returns if every cycle routine
    /// has panicked or the runtime is shutting down.
    pub async fn run_all(&self, entities: Vec<Entity>) {
        let mut cycles = JoinSet::new();
        for entity in &entities {
            let scheduler = self.clone();
            let handle = entity.handle();
            cycles.spawn(async move { scheduler.run_entity_cycle(handle).await });
        }
        info!(entities = entities.len(), "task cycles dispatched");

        while let Some(joined) = cycles.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "entity cycle terminated");
            }
        }
        warn!("all entity cycles have terminated");
    }

    /// Run cycles for one entity forever: dispatch, join, idle while halted, repeat.
    pub async fn run_entity_cycle(&self, entity: EntityHandle) {
        loop {
            let report = self.run_cycle(entity).await;
            debug!(
                entity = %entity.id,
                dispatched = report.dispatched,
                failed = report.failed,
                "cycle joined"
            );
            if report.completed.is_empty() {
                // Nothing ran to completion; pace the next attempt.
                tokio::time::sleep(self.inner.config.poll_interval()).await;
            }
            self.hold_while_halted(&entity.id).await;
        }
    }

    /// Dispatch one cycle of `2..=max_tasks_per_cycle` concurrent tasks and join all.
    pub async fn run_cycle(&self, entity: EntityHandle) -> CycleReport {
        let count = self.draw_task_count();
        let mut tasks = JoinSet::new();
        for ordinal in 1..=count {
            let scheduler = self.clone();
            let label = TaskLabel::ordinal(ordinal);
            tasks.spawn(async move { scheduler.run_task(entity, label).await });
        }

        let mut report = CycleReport {
            dispatched: count,
            ..CycleReport::default()
        };
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(task)) => report.completed.push(task),
                Ok(Err(e)) => {
                    report.failed += 1;
                    error!(entity = %entity.id, error = %e, "task abandoned");
                }
                Err(e) => {
                    report.failed += 1;
                    error!(entity = %entity.id, error = %e, "task routine panicked");
                }
            }
        }
        report
    }

    /// Run a single task for `entity` under `label`.
    ///
    /// # Errors
    ///
    /// Returns the store or log error that aborted the task after retries ran out.
    pub async fn run_task(
        &self,
        entity: EntityHandle,
        label: TaskLabel,
    ) -> Result<TaskReport, SchedulerError> {
        let duration = self.draw_duration();
        let deadline_ms = now_ms() + duration.as_millis();

        self.record_start(entity, &label, deadline_ms).await?;
        trace_started(entity, &label, duration);

        let ended_by = self.wait_or_halt(&entity.id, duration).await;
        if ended_by == TaskEnd::Halted {
            debug!(entity = %entity.id, task = %label, "task cut short by halt");
        }

        self.record_finish(entity, &label).await?;
        trace_finished(entity, &label);

        Ok(TaskReport {
            label,
            duration,
            deadline_ms,
            ended_by,
        })
    }

    /// Sleep in poll-interval steps until `duration` is used up or the entity is halted.
    async fn wait_or_halt(&self, id: &EntityId, duration: Duration) -> TaskEnd {
        let poll = self.inner.config.poll_interval();
        let mut waited = Duration::ZERO;
        while waited < duration {
            let step = poll.min(duration - waited);
            tokio::time::sleep(step).await;
            waited += step;
            if self.inner.control.is_halted(id) {
                return TaskEnd::Halted;
            }
        }
        TaskEnd::Elapsed
    }

    /// Idle in poll-interval steps while the entity stays halted.
    async fn hold_while_halted(&self, id: &EntityId) {
        let poll = self.inner.config.poll_interval();
        if self.inner.control.is_halted(id) {
            debug!(entity = %id, "entity halted, holding");
        }
        while self.inner.control.is_halted(id) {
            tokio::time::sleep(poll).await;
        }
    }

    async fn record_start(
        &self,
        entity: EntityHandle,
        label: &TaskLabel,
        deadline_ms: u128,
    ) -> Result<(), SchedulerError> {
        let retry = &self.inner.config.retry;
        let store = &self.inner.store;
        let log = &self.inner.log;

        with_retry(retry, "set_active_task", || {
            store.set_active_task(&entity.id, label, deadline_ms)
        })
        .await?;

        let appended = with_retry(retry, "append_started", || {
            log.append(build_log_entry(entity, label, TaskStatus::Started))
        })
        .await;

        if let Err(e) = appended {
            // No `started` entry exists, so the deadline must not outlive this attempt.
            if let Err(cleanup) = with_retry(retry, "clear_active_task", || {
                store.clear_active_task(&entity.id, label)
            })
            .await
            {
                error!(entity = %entity.id, task = %label, error = %cleanup, "orphaned active task");
            }
            return Err(e);
        }
        Ok(())
    }

    async fn record_finish(
        &self,
        entity: EntityHandle,
        label: &TaskLabel,
    ) -> Result<(), SchedulerError> {
        let retry = &self.inner.config.retry;
        let store = &self.inner.store;
        let log = &self.inner.log;

        let cleared = with_retry(retry, "clear_active_task", || {
            store.clear_active_task(&entity.id, label)
        })
        .await;

        // The finished entry is appended even when the clear failed, so every
        // started entry keeps its pair.
        let appended = with_retry(retry, "append_finished", || {
            log.append(build_log_entry(entity, label, TaskStatus::Finished))
        })
        .await;

        cleared.and(appended)
    }
}
