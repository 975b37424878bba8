//! Entity store backends.

pub mod memory;

pub use memory::InMemoryEntityStore;
