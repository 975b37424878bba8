//! Telemetry helpers for structured logging and the operational task trace.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::core::trace::{TRACE_TARGET, VISION_TARGET};

/// Filter used when `RUST_LOG` is unset: task trace and area sweeps stay visible.
pub const DEFAULT_FILTER: &str = "info";

/// `RUST_LOG` when set and valid, [`DEFAULT_FILTER`] otherwise.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter()).try_init();
}

/// Like [`init_tracing`], and additionally appends every `task_trace` and
/// `visible_area` line to `path` as plain timestamped text.
///
/// # Errors
///
/// Fails if the trace file cannot be opened for appending.
pub fn init_tracing_with_trace_file(path: impl AsRef<Path>) -> io::Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(env_filter());
    let trace_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .with_filter(
            Targets::new()
                .with_target(TRACE_TARGET, Level::INFO)
                .with_target(VISION_TARGET, Level::INFO),
        );

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(trace_layer)
        .try_init();
    Ok(())
}
