//! Tests for error types

use entity_task_scheduler::core::{EntityId, SchedulerError};

#[test]
fn test_store_error() {
    let err = SchedulerError::Store("connection refused".to_string());
    assert_eq!(format!("{}", err), "entity store error: connection refused");
}

#[test]
fn test_log_error() {
    let err = SchedulerError::Log("disk full".to_string());
    assert_eq!(format!("{}", err), "task log error: disk full");
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_tasks_per_cycle must be at least 2".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_tasks_per_cycle must be at least 2"
    );
}

#[test]
fn test_unknown_entity_error() {
    let id = EntityId::new();
    let err = SchedulerError::UnknownEntity(id);
    assert_eq!(format!("{}", err), format!("unknown entity: {id}"));
}
