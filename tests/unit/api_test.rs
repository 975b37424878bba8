//! Tests for the control API models

use entity_task_scheduler::config::{SchedulerConfig, VisionConfig, WorldConfig};
use entity_task_scheduler::core::{
    ControlChannel, Entity, EntityId, Position, RunStateChange, SchedulerError,
};
use entity_task_scheduler::infra::InMemoryEntityStore;
use entity_task_scheduler::runtime::{
    area_center, entity_view, health, set_run_state, snapshot, RunStateRequest,
};

#[test]
fn test_request_from_query_defaults_to_resume() {
    let id = EntityId::new();
    let req = RunStateRequest::from_query(&id.to_string(), None).unwrap();
    assert_eq!(req.entity_id, id);
    assert!(req.running);

    let req = RunStateRequest::from_query(&id.to_string(), Some(0)).unwrap();
    assert!(!req.running);
}

#[test]
fn test_request_from_query_rejects_bad_id() {
    let err = RunStateRequest::from_query("5c6f", Some(1)).unwrap_err();
    assert!(err.starts_with("wrong entity_id"));
}

#[test]
fn test_set_run_state_round_trip() {
    let id = EntityId::new();
    let control = ControlChannel::with_entities([id]);

    let halt = set_run_state(&control, RunStateRequest { entity_id: id, running: false });
    assert_eq!(halt.outcome, RunStateChange::Halted);
    assert!(halt.accepted());

    let resume = set_run_state(&control, RunStateRequest { entity_id: id, running: true });
    assert_eq!(resume.outcome, RunStateChange::Resumed);

    let again = set_run_state(&control, RunStateRequest { entity_id: id, running: true });
    assert_eq!(again.outcome, RunStateChange::Unchanged);
    assert!(!control.is_halted(&id));
}

#[test]
fn test_unknown_entity_not_accepted() {
    let control = ControlChannel::new();
    let resp = set_run_state(
        &control,
        RunStateRequest {
            entity_id: EntityId::new(),
            running: false,
        },
    );
    assert_eq!(resp.outcome, RunStateChange::Ignored);
    assert!(!resp.accepted());

    let json = serde_json::to_value(resp).unwrap();
    assert_eq!(json["outcome"], "ignored");
}

#[test]
fn test_snapshot_counts_halted() {
    let ids = [EntityId::new(), EntityId::new()];
    let control = ControlChannel::with_entities(ids);
    control.set_run_state(&ids[1], false);

    let snap = snapshot(&SchedulerConfig::default(), &control);
    assert_eq!(snap.halted_entities, 1);
    assert_eq!(snap.max_tasks_per_cycle, 4);
    assert!(health().ok);
}

fn small_world() -> WorldConfig {
    WorldConfig {
        width: 64,
        height: 64,
        population: 10,
    }
}

#[test]
fn test_area_center_falls_back_when_off_map() {
    let world = small_world();
    let own = Position::new(5, 6);

    assert_eq!(area_center(None, own, &world), own);
    assert_eq!(area_center(Some(Position::new(64, 0)), own, &world), Position::new(64, 0));
    assert_eq!(area_center(Some(Position::new(-1, 3)), own, &world), own);
    assert_eq!(area_center(Some(Position::new(3, 65)), own, &world), own);
    assert_eq!(area_center(Some(Position::new(i64::MAX, 0)), own, &world), own);
}

#[test]
fn test_entity_view_excludes_self() {
    let me = Entity::new(Position::new(10, 10));
    let near = Entity::new(Position::new(20, 4));
    let far = Entity::new(Position::new(60, 60));
    let store = InMemoryEntityStore::from_entities([me.clone(), near.clone(), far.clone()]);
    let vision = VisionConfig::default();

    let view = entity_view(&store, &me.id, None, &small_world(), &vision).unwrap();
    assert_eq!(view.entity.id, me.id);
    assert_eq!(view.center, me.position);
    assert_eq!(view.visible.iter().map(|e| e.id).collect::<Vec<_>>(), vec![near.id]);

    // Re-centred on the far corner: the requested entity is outside its own view.
    let view = entity_view(&store, &me.id, Some(Position::new(60, 60)), &small_world(), &vision)
        .unwrap();
    assert_eq!(view.center, Position::new(60, 60));
    assert_eq!(view.visible.iter().map(|e| e.id).collect::<Vec<_>>(), vec![far.id]);
}

#[test]
fn test_entity_view_unknown_entity() {
    let store = InMemoryEntityStore::new();
    let result = entity_view(
        &store,
        &EntityId::new(),
        None,
        &small_world(),
        &VisionConfig::default(),
    );
    assert!(matches!(result, Err(SchedulerError::UnknownEntity(_))));
}
