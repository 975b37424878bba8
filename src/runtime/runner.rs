//! One-time bootstrap: load entities, register them, launch the cycle engine.
//!
//! The engine runs as a single background unit, either on a dedicated OS thread that
//! owns its own tokio runtime ([`Runner::start`]) or as one task on a runtime the
//! caller already has ([`Runner::start_on`]). Control requests are served elsewhere
//! and reach the engine only through the shared [`ControlChannel`].

use std::sync::Arc;
use std::thread;

use tokio::runtime::Handle;
use tracing::info;

use crate::builders::SchedulerBuilder;
use crate::config::{RunnerConfig, SchedulerConfig};
use crate::core::{ControlChannel, Entity, EntityStore, Scheduler, SchedulerError, TaskLog};

enum Background {
    Thread(thread::JoinHandle<()>),
    Task(tokio::task::JoinHandle<()>),
}

/// Handle to a launched engine. Dropping it does not stop the engine.
pub struct RunnerHandle {
    control: ControlChannel,
    entity_count: usize,
    runtime: Handle,
    background: Background,
}

impl RunnerHandle {
    /// Control channel shared with the engine.
    #[must_use]
    pub const fn control(&self) -> &ControlChannel {
        &self.control
    }

    /// Runtime hosting the engine, for spawning companions such as the area watcher.
    #[must_use]
    pub const fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Number of entities loaded at boot.
    #[must_use]
    pub const fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Whether the background unit has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.background {
            Background::Thread(handle) => handle.is_finished(),
            Background::Task(handle) => handle.is_finished(),
        }
    }
}

/// Bootstraps the scheduler from an entity store.
pub struct Runner<S, L> {
    scheduler_config: SchedulerConfig,
    runner_config: RunnerConfig,
    store: Arc<S>,
    log: Arc<L>,
    control: ControlChannel,
    seed: Option<u64>,
}

impl<S, L> Runner<S, L>
where
    S: EntityStore + 'static,
    L: TaskLog + 'static,
{
    /// Runner with default runner options.
    pub fn new(
        scheduler_config: SchedulerConfig,
        store: Arc<S>,
        log: Arc<L>,
        control: ControlChannel,
    ) -> Self {
        Self {
            scheduler_config,
            runner_config: RunnerConfig::default(),
            store,
            log,
            control,
            seed: None,
        }
    }

    /// Override runner options.
    #[must_use]
    pub fn with_runner_config(mut self, runner_config: RunnerConfig) -> Self {
        self.runner_config = runner_config;
        self
    }

    /// Seed the scheduler's random source.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Launch the engine on a dedicated thread with its own multi-threaded runtime.
    ///
    /// The runtime stays up for the life of the process, even with
    /// `assign_on_boot` disabled.
    ///
    /// # Errors
    ///
    /// Invalid configuration, a failed entity load, or a failure to build the runtime
    /// or thread. Nothing is launched in any of these cases.
    pub fn start(self) -> Result<RunnerHandle, SchedulerError> {
        let worker_threads = self.runner_config.worker_threads;
        let (scheduler, entities, assign) = self.prepare()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("task-cycles")
            .enable_all()
            .build()
            .map_err(|e| SchedulerError::Runtime(format!("build runtime: {e}")))?;

        let control = scheduler.control().clone();
        let entity_count = entities.len();
        let runtime_handle = runtime.handle().clone();
        let thread = thread::Builder::new()
            .name("task-scheduler".into())
            .spawn(move || {
                runtime.block_on(async move {
                    dispatch(scheduler, entities, assign).await;
                    // Keep the runtime up for tasks spawned through `RunnerHandle::runtime`.
                    std::future::pending::<()>().await;
                });
            })
            .map_err(|e| SchedulerError::Runtime(format!("spawn scheduler thread: {e}")))?;

        Ok(RunnerHandle {
            control,
            entity_count,
            runtime: runtime_handle,
            background: Background::Thread(thread),
        })
    }

    /// Launch the engine as one task on an existing runtime.
    ///
    /// # Errors
    ///
    /// Invalid configuration or a failed entity load; nothing is launched then.
    pub fn start_on(self, handle: &Handle) -> Result<RunnerHandle, SchedulerError> {
        let (scheduler, entities, assign) = self.prepare()?;
        let control = scheduler.control().clone();
        let entity_count = entities.len();
        let task = handle.spawn(dispatch(scheduler, entities, assign));

        Ok(RunnerHandle {
            control,
            entity_count,
            runtime: handle.clone(),
            background: Background::Task(task),
        })
    }

    fn prepare(self) -> Result<(Scheduler<S, L>, Vec<Entity>, bool), SchedulerError> {
        self.runner_config
            .validate()
            .map_err(SchedulerError::InvalidConfig)?;

        let mut builder = SchedulerBuilder::new(Arc::clone(&self.store), self.log)
            .config(self.scheduler_config)
            .control(self.control.clone());
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        let scheduler = builder.build()?;

        let entities = self.store.load_all()?;
        self.control.register(entities.iter().map(|e| e.id));
        info!(entities = entities.len(), "entities loaded");

        Ok((scheduler, entities, self.runner_config.assign_on_boot))
    }
}

async fn dispatch<S, L>(scheduler: Scheduler<S, L>, entities: Vec<Entity>, assign: bool)
where
    S: EntityStore + 'static,
    L: TaskLog + 'static,
{
    if assign {
        scheduler.run_all(entities).await;
    } else {
        info!("task assignment on boot disabled; entities left idle");
    }
}
