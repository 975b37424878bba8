//! # Entity Task Scheduler
//!
//! Perpetual, randomized task cycles for a fixed population of independent entities.
//!
//! Every entity loaded at boot gets its own never-ending sequence of *task cycles*.
//! A cycle dispatches between two and `max_tasks_per_cycle` concurrent tasks, each with
//! a duration drawn once from a configured range, and joins all of them before the
//! next cycle begins. Task lifecycles are written to an [`core::EntityStore`] (the
//! active-task deadline) and an append-only [`core::TaskLog`], and traced as
//! human-readable lines on the `task_trace` target.
//!
//! ## Cancellation
//!
//! Callers pause an entity through the [`core::ControlChannel`]. Tasks poll the
//! channel at a fixed interval and stop waiting once their entity is halted; the
//! deadline already committed to the store is left as it was. A halted entity then
//! idles between cycles until it is resumed.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use entity_task_scheduler::config::SchedulerConfig;
//! use entity_task_scheduler::core::ControlChannel;
//! use entity_task_scheduler::infra::{InMemoryEntityStore, InMemoryTaskLog};
//! use entity_task_scheduler::runtime::Runner;
//!
//! let store = Arc::new(InMemoryEntityStore::from_entities(entities));
//! let log = Arc::new(InMemoryTaskLog::new());
//! let control = ControlChannel::new();
//!
//! let handle = Runner::new(SchedulerConfig::default(), store, log, control.clone())
//!     .start()?;
//!
//! // Later, from any thread:
//! control.set_run_state(&entity_id, false); // halt
//! control.set_run_state(&entity_id, true);  // resume
//! ```
//!
//! ## Failure isolation
//!
//! Store and log calls are retried with exponential backoff. When retries run out
//! the affected task is abandoned and reported through `tracing`; sibling tasks and
//! every other entity keep cycling.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Scheduling core: entities, control channel, ports, and the cycle engine.
pub mod core;
/// Configuration models for the scheduler, world, and runner.
pub mod config;
/// Builders that validate configuration and assemble a scheduler.
pub mod builders;
/// Infrastructure adapters for entity stores, task logs, and world generation.
pub mod infra;
/// Runner bootstrap, the area watcher, and the control API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
