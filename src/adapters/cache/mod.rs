//! In-memory caching layer for config reads.
//!
//! Uses `moka` for TTL-based concurrent caching. The cache wraps a fetch
//! future supplied by the caller, so it composes with any transport.

pub mod value_cache;

pub use value_cache::ValueCache;
