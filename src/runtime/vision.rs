//! Area watcher: a background sweep that logs the entities inside one visible area.
//!
//! Each sweep reads the area through [`EntityQuery`] and emits one line per entity on
//! the [`VISION_TARGET`] target, showing the time left on every active task. At most
//! one area is watched at a time; starting a new watch replaces the old one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use crate::core::trace::{area_line, VISION_TARGET};
use crate::core::{Area, EntityQuery};
use crate::util::clock::now_ms;

struct ActiveWatch {
    area: Area,
    task: JoinHandle<()>,
}

/// Start/stop control over the area sweep loop.
pub struct AreaWatcher<Q> {
    store: Arc<Q>,
    interval: Duration,
    sweeps: Arc<AtomicU64>,
    active: Mutex<Option<ActiveWatch>>,
}

impl<Q> AreaWatcher<Q>
where
    Q: EntityQuery + 'static,
{
    /// Watcher reading from `store`, sweeping every `interval`.
    pub fn new(store: Arc<Q>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            sweeps: Arc::new(AtomicU64::new(0)),
            active: Mutex::new(None),
        }
    }

    /// Start sweeping `area` on `runtime`. Returns the area that was being watched
    /// before, if any; its loop is cancelled.
    pub fn start(&self, runtime: &Handle, area: Area) -> Option<Area> {
        let store = Arc::clone(&self.store);
        let sweeps = Arc::clone(&self.sweeps);
        let task = runtime.spawn(sweep_loop(store, area, self.interval, sweeps));

        let previous = self.active.lock().replace(ActiveWatch { area, task });
        info!(?area, "area watch started");
        previous.map(|watch| {
            watch.task.abort();
            watch.area
        })
    }

    /// Stop the current watch. Returns the area that was being watched, if any.
    pub fn stop(&self) -> Option<Area> {
        let watch = self.active.lock().take()?;
        watch.task.abort();
        info!(area = ?watch.area, "area watch stopped");
        Some(watch.area)
    }

    /// Area currently watched.
    #[must_use]
    pub fn watching(&self) -> Option<Area> {
        self.active.lock().as_ref().map(|watch| watch.area)
    }

    /// Sweeps completed since the watcher was created.
    #[must_use]
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }
}

impl<Q> Drop for AreaWatcher<Q> {
    fn drop(&mut self) {
        if let Some(watch) = self.active.get_mut().take() {
            watch.task.abort();
        }
    }
}

/// Render one sweep of `area`, ordered by position.
pub fn sweep_lines<Q: EntityQuery + ?Sized>(store: &Q, area: &Area, now_ms: u128) -> Vec<String> {
    let mut entities = store.entities_in(area);
    entities.sort_by_key(|e| (e.position.x, e.position.y));
    entities.iter().map(|e| area_line(e, now_ms)).collect()
}

async fn sweep_loop<Q: EntityQuery>(
    store: Arc<Q>,
    area: Area,
    interval: Duration,
    sweeps: Arc<AtomicU64>,
) {
    loop {
        for line in sweep_lines(store.as_ref(), &area, now_ms()) {
            info!(target: VISION_TARGET, "{line}");
        }
        sweeps.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(interval).await;
    }
}
