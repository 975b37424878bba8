//! Tests for configuration validation

use entity_task_scheduler::config::{AppConfig, RetryConfig, SchedulerConfig, WorldConfig};

#[test]
fn test_scheduler_config_validation() {
    let valid = SchedulerConfig {
        min_task_duration_secs: 10,
        max_task_duration_secs: 600,
        max_tasks_per_cycle: 4,
        poll_interval_ms: 1_000,
        retry: RetryConfig::default(),
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_min_duration_above_max() {
    let invalid = SchedulerConfig {
        min_task_duration_secs: 601,
        max_task_duration_secs: 600,
        ..SchedulerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_max_tasks_below_two() {
    for max_tasks_per_cycle in [0, 1] {
        let invalid = SchedulerConfig {
            max_tasks_per_cycle,
            ..SchedulerConfig::default()
        };
        assert!(invalid.validate().is_err());
    }
}

#[test]
fn test_zero_poll_interval() {
    let invalid = SchedulerConfig {
        poll_interval_ms: 0,
        ..SchedulerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "min_task_duration_secs": 10,
        "max_task_duration_secs": 10,
        "max_tasks_per_cycle": 2,
        "poll_interval_ms": 1000
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_tasks_per_cycle, 2);
    assert_eq!(config.retry, RetryConfig::default());
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    let json = r#"{ "min_task_duration_secs": 20, "max_task_duration_secs": 10 }"#;
    assert!(SchedulerConfig::from_json_str(json).is_err());
}

#[test]
fn test_app_config_from_json() {
    let json = r#"{
        "scheduler": { "max_tasks_per_cycle": 3 },
        "world": { "width": 64, "height": 64, "population": 100 },
        "runner": { "worker_threads": 2, "assign_on_boot": false }
    }"#;

    let config = AppConfig::from_json_str(json).unwrap();
    assert_eq!(config.world.population, 100);
    assert!(!config.runner.assign_on_boot);
    assert!(config.runner.task_log_path.is_none());
}

#[test]
fn test_app_config_reports_section() {
    let config = AppConfig {
        world: WorldConfig {
            width: 2,
            height: 2,
            population: 10,
        },
        ..AppConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.starts_with("world invalid"));
}
