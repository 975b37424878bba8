//! Infrastructure adapters for entity stores, task logs, and world generation.

pub mod log;
pub mod store;
pub mod world;

pub use log::{InMemoryTaskLog, JsonLinesTaskLog};
pub use store::InMemoryEntityStore;
pub use world::WorldGenerator;
