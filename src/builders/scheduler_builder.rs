//! Builder to construct a [`Scheduler`] from configuration.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SchedulerConfig;
use crate::core::{ControlChannel, EntityStore, Scheduler, SchedulerError, TaskLog};

/// Step-by-step scheduler construction.
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::new(store, log)
///     .config(cfg)
///     .control(control.clone())
///     .seed(42)
///     .build()?;
/// ```
pub struct SchedulerBuilder<S, L> {
    config: SchedulerConfig,
    store: Arc<S>,
    log: Arc<L>,
    control: Option<ControlChannel>,
    seed: Option<u64>,
}

impl<S, L> SchedulerBuilder<S, L>
where
    S: EntityStore + 'static,
    L: TaskLog + 'static,
{
    /// Start from the default configuration.
    pub fn new(store: Arc<S>, log: Arc<L>) -> Self {
        Self {
            config: SchedulerConfig::default(),
            store,
            log,
            control: None,
            seed: None,
        }
    }

    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing control channel.
    #[must_use]
    pub fn control(mut self, control: ControlChannel) -> Self {
        self.control = Some(control);
        self
    }

    /// Seed the random source for reproducible task counts and durations.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] when the configuration does not validate.
    pub fn build(self) -> Result<Scheduler<S, L>, SchedulerError> {
        let control = self.control.unwrap_or_default();
        let rng = self
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Scheduler::with_rng(self.config, self.store, self.log, control, rng)
    }
}

/// Build a scheduler from configuration, sharing `control` with the caller.
///
/// # Errors
///
/// [`SchedulerError::InvalidConfig`] when the configuration does not validate.
pub fn build_scheduler<S, L>(
    cfg: &SchedulerConfig,
    store: Arc<S>,
    log: Arc<L>,
    control: ControlChannel,
) -> Result<Scheduler<S, L>, SchedulerError>
where
    S: EntityStore + 'static,
    L: TaskLog + 'static,
{
    SchedulerBuilder::new(store, log)
        .config(cfg.clone())
        .control(control)
        .build()
}
