//! Adapters composed around the config transport.

pub mod cache;
pub mod memory;

pub use cache::ValueCache;
pub use memory::InMemoryTransport;
