//! Task log backends.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonLinesTaskLog;
pub use memory::InMemoryTaskLog;
