//! Shared utilities.

pub mod clock;
pub mod telemetry;

pub use clock::now_ms;
pub use telemetry::{env_filter, init_tracing, init_tracing_with_trace_file, DEFAULT_FILTER};
