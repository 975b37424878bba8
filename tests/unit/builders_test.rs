//! Tests for scheduler builders

use std::sync::Arc;

use entity_task_scheduler::builders::{build_scheduler, SchedulerBuilder};
use entity_task_scheduler::config::SchedulerConfig;
use entity_task_scheduler::core::{ControlChannel, EntityId, RunStateChange, SchedulerError};
use entity_task_scheduler::infra::{InMemoryEntityStore, InMemoryTaskLog};

fn parts() -> (Arc<InMemoryEntityStore>, Arc<InMemoryTaskLog>) {
    (
        Arc::new(InMemoryEntityStore::new()),
        Arc::new(InMemoryTaskLog::new()),
    )
}

#[test]
fn test_same_seed_same_draws() {
    let (store, log) = parts();
    let a = SchedulerBuilder::new(Arc::clone(&store), Arc::clone(&log))
        .seed(42)
        .build()
        .unwrap();
    let b = SchedulerBuilder::new(store, log).seed(42).build().unwrap();

    let draws_a: Vec<_> = (0..20).map(|_| (a.draw_task_count(), a.draw_duration())).collect();
    let draws_b: Vec<_> = (0..20).map(|_| (b.draw_task_count(), b.draw_duration())).collect();
    assert_eq!(draws_a, draws_b);
}

#[test]
fn test_build_scheduler_shares_control() {
    let (store, log) = parts();
    let id = EntityId::new();
    let control = ControlChannel::with_entities([id]);

    let scheduler =
        build_scheduler(&SchedulerConfig::default(), store, log, control.clone()).unwrap();
    assert_eq!(control.set_run_state(&id, false), RunStateChange::Halted);
    assert!(scheduler.control().is_halted(&id));
}

#[test]
fn test_build_rejects_invalid_config() {
    let (store, log) = parts();
    let cfg = SchedulerConfig {
        min_task_duration_secs: 11,
        max_task_duration_secs: 10,
        ..SchedulerConfig::default()
    };
    let result = SchedulerBuilder::new(store, log).config(cfg).build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}
