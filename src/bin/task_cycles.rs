//! `task-cycles`: seed a world, run perpetual task cycles, and take control commands
//! on stdin.
//!
//! Commands, one per line:
//!
//! ```text
//! halt <entity-id>      stop an entity's tasks at the next poll and hold it
//! resume <entity-id>    let a halted entity start new cycles
//! list [n]              print the first n entities (default 10)
//! area <x> <y>          print entities in the visible area centred on (x, y)
//! show <id> [x y]       print an entity and its visible neighbours
//! watch <id> [x y]      log the entity's visible area every interval
//! unwatch               stop the area log
//! status                print configuration and halt-set size
//! ```
//!
//! For `show` and `watch` the area is centred on (x, y) when it lies on the map, and
//! on the entity otherwise.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use entity_task_scheduler::config::AppConfig;
use entity_task_scheduler::core::{
    AppResult, Area, ControlChannel, Entity, EntityId, EntityStore, Position, TaskLog,
};
use entity_task_scheduler::infra::{
    InMemoryEntityStore, InMemoryTaskLog, JsonLinesTaskLog, WorldGenerator,
};
use entity_task_scheduler::runtime::{
    self, AreaWatchResponse, AreaWatcher, RunStateRequest, Runner, RunnerHandle,
};
use entity_task_scheduler::util::{init_tracing, init_tracing_with_trace_file};

struct Session<'a> {
    cfg: &'a AppConfig,
    store: &'a InMemoryEntityStore,
    handle: &'a RunnerHandle,
    watcher: &'a AreaWatcher<InMemoryEntityStore>,
}

fn main() -> AppResult<()> {
    let cfg = AppConfig::from_env().map_err(|e| anyhow!(e))?;

    match &cfg.runner.trace_path {
        Some(path) => init_tracing_with_trace_file(path)
            .with_context(|| format!("opening trace file {}", path.display()))?,
        None => init_tracing(),
    }

    let generator = WorldGenerator::new(cfg.world.clone())?;
    let store = Arc::new(InMemoryEntityStore::from_entities(
        generator.generate(&mut rand::rng()),
    ));
    tracing::info!(
        entities = store.len(),
        width = cfg.world.width,
        height = cfg.world.height,
        "world generated"
    );

    match &cfg.runner.task_log_path {
        Some(path) => serve(&cfg, store, Arc::new(JsonLinesTaskLog::open(path)?)),
        None => serve(&cfg, store, Arc::new(InMemoryTaskLog::new())),
    }
}

fn serve<L: TaskLog + 'static>(
    cfg: &AppConfig,
    store: Arc<InMemoryEntityStore>,
    log: Arc<L>,
) -> AppResult<()> {
    let handle = Runner::new(
        cfg.scheduler.clone(),
        Arc::clone(&store),
        log,
        ControlChannel::new(),
    )
    .with_runner_config(cfg.runner.clone())
    .start()?;
    let watcher = AreaWatcher::new(Arc::clone(&store), cfg.vision.log_interval());
    let session = Session {
        cfg,
        store: &store,
        handle: &handle,
        watcher: &watcher,
    };

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if let Err(e) = handle_command(line.trim(), &session, &mut out) {
            writeln!(out, "error: {e}")?;
        }
        out.flush()?;
    }
    Ok(())
}

fn handle_command(line: &str, session: &Session<'_>, out: &mut impl Write) -> AppResult<()> {
    let Session {
        cfg,
        store,
        handle,
        watcher,
    } = session;
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => Ok(()),
        Some(cmd @ ("halt" | "resume")) => {
            let id = parts.next().ok_or_else(|| anyhow!("usage: {cmd} <entity-id>"))?;
            let control = i64::from(cmd == "resume");
            let req = RunStateRequest::from_query(id, Some(control)).map_err(|e| anyhow!(e))?;
            let resp = runtime::set_run_state(handle.control(), req);
            writeln!(out, "{}", serde_json::to_string(&resp)?)?;
            Ok(())
        }
        Some("list") => {
            let limit = parts.next().map(str::parse::<usize>).transpose()?.unwrap_or(10);
            let mut entities = store.load_all()?;
            entities.sort_by_key(|e| (e.position.x, e.position.y));
            print_entities(out, entities.iter().take(limit))
        }
        Some("area") => {
            let x: i64 = parts.next().ok_or_else(|| anyhow!("usage: area <x> <y>"))?.parse()?;
            let y: i64 = parts.next().ok_or_else(|| anyhow!("usage: area <x> <y>"))?.parse()?;
            let area = Area::around(
                Position::new(x, y),
                cfg.vision.area_width,
                cfg.vision.area_height,
            );
            let found = store.find_in_area(&area);
            print_entities(out, found.iter())
        }
        Some(cmd @ ("show" | "watch")) => {
            let id: EntityId = parts
                .next()
                .ok_or_else(|| anyhow!("usage: {cmd} <entity-id> [x y]"))?
                .parse()
                .map_err(|_| anyhow!("wrong entity_id"))?;
            let requested = parse_center(parts.next(), parts.next())?;
            let view = runtime::entity_view(*store, &id, requested, &cfg.world, &cfg.vision)?;

            if cmd == "show" {
                writeln!(out, "{}", serde_json::to_string(&view)?)?;
            } else {
                watcher.start(handle.runtime(), view.area);
                let resp = AreaWatchResponse {
                    entity_id: Some(id),
                    center: Some(view.center),
                    watching: true,
                };
                writeln!(out, "{}", serde_json::to_string(&resp)?)?;
            }
            Ok(())
        }
        Some("unwatch") => {
            watcher.stop();
            let resp = AreaWatchResponse {
                entity_id: None,
                center: None,
                watching: false,
            };
            writeln!(out, "{}", serde_json::to_string(&resp)?)?;
            Ok(())
        }
        Some("status") => {
            let snap = runtime::snapshot(&cfg.scheduler, handle.control());
            writeln!(out, "{}", serde_json::to_string(&snap)?)?;
            Ok(())
        }
        Some(other) => Err(anyhow!("unknown command: {other}")),
    }
}

fn parse_center(x: Option<&str>, y: Option<&str>) -> AppResult<Option<Position>> {
    match (x, y) {
        (None, None) => Ok(None),
        (Some(x), Some(y)) => Ok(Some(Position::new(x.parse()?, y.parse()?))),
        _ => Err(anyhow!("give both x and y, or neither")),
    }
}

fn print_entities<'a>(
    out: &mut impl Write,
    entities: impl Iterator<Item = &'a Entity>,
) -> AppResult<()> {
    for entity in entities {
        writeln!(out, "{}", serde_json::to_string(entity)?)?;
    }
    Ok(())
}
