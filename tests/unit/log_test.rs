//! Tests for task log backends

use std::sync::Arc;
use std::thread;

use entity_task_scheduler::core::{
    build_log_entry, Entity, Position, TaskLabel, TaskLog, TaskStatus,
};
use entity_task_scheduler::infra::{InMemoryTaskLog, JsonLinesTaskLog};

#[test]
fn test_in_memory_log_filters_by_entity() {
    let log = InMemoryTaskLog::new();
    let a = Entity::new(Position::new(1, 1));
    let b = Entity::new(Position::new(2, 2));
    let label = TaskLabel::ordinal(1);

    log.append(build_log_entry(a.handle(), &label, TaskStatus::Started)).unwrap();
    log.append(build_log_entry(b.handle(), &label, TaskStatus::Started)).unwrap();
    log.append(build_log_entry(a.handle(), &label, TaskStatus::Finished)).unwrap();

    let own = log.entries_for(&a.id);
    assert_eq!(own.len(), 2);
    assert_eq!(own[0].status, TaskStatus::Started);
    assert_eq!(own[1].status, TaskStatus::Finished);
    assert_eq!(own[1].position, Position::new(1, 1));
    assert!(own[0].created_at_ms <= own[1].created_at_ms);
}

#[test]
fn test_jsonl_log_appends_and_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.jsonl");
    let entity = Entity::new(Position::new(9, 3));

    {
        let log = JsonLinesTaskLog::open(&path).unwrap();
        log.append(build_log_entry(entity.handle(), &TaskLabel::ordinal(2), TaskStatus::Started))
            .unwrap();
    }
    // Reopening appends rather than truncating.
    let log = JsonLinesTaskLog::open(&path).unwrap();
    log.append(build_log_entry(entity.handle(), &TaskLabel::ordinal(2), TaskStatus::Finished))
        .unwrap();

    let entries = JsonLinesTaskLog::read_all(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entity_id, entity.id);
    assert_eq!(entries[0].task, TaskLabel::ordinal(2));
    assert_eq!(entries[1].status, TaskStatus::Finished);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.lines().next().unwrap().contains(r#""status":"started""#));
}

#[test]
fn test_jsonl_log_concurrent_appends_keep_lines_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.jsonl");
    let log = Arc::new(JsonLinesTaskLog::open(&path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                let entity = Entity::new(Position::new(i, i));
                for n in 1..=50 {
                    log.append(build_log_entry(entity.handle(), &TaskLabel::ordinal(n), TaskStatus::Started))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(JsonLinesTaskLog::read_all(&path).unwrap().len(), 400);
}
