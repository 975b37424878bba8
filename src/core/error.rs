//! Error types for scheduler operations.

use thiserror::Error;

use super::EntityId;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Entity store backend failure.
    #[error("entity store error: {0}")]
    Store(String),
    /// Task log backend failure.
    #[error("task log error: {0}")]
    Log(String),
    /// Configuration rejected at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Entity id not present in the store or control registry.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),
    /// A retried operation kept failing.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Name of the operation that was retried.
        operation: &'static str,
        /// Total attempts made, including the first.
        attempts: u32,
        /// Last error observed.
        source: Box<SchedulerError>,
    },
    /// Runtime or thread bootstrap failure.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl SchedulerError {
    /// Backend I/O failures may succeed on a later attempt; everything else is final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Log(_))
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
