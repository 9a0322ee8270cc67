//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::sync::Arc;
use std::time::Duration;

use remote_config::{CacheConfig, ConfigAccessor, InMemoryTransport, RetryPolicy};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fast retries so outage tests finish quickly
#[allow(dead_code)]
pub const fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, 1, 5)
}

/// Cache settings with the given capacity and TTL
#[allow(dead_code)]
pub fn cache_config(capacity: u64, ttl: Duration) -> CacheConfig {
    CacheConfig {
        capacity,
        ttl_ms: u64::try_from(ttl.as_millis()).expect("ttl fits in u64"),
        ..CacheConfig::default()
    }
}

/// Accessor over `transport` in the `dev` environment with fast retries
#[allow(dead_code)]
pub fn accessor(transport: &Arc<InMemoryTransport>, cache: &CacheConfig) -> ConfigAccessor {
    ConfigAccessor::builder(transport.clone())
        .environment("dev")
        .cache(cache)
        .retry(fast_retry(2))
        .request_timeout(Duration::from_secs(2))
        .build()
}
