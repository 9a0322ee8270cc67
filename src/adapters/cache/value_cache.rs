//! TTL cache for raw config values using moka.
//!
//! Records are evicted by strict LRU once `capacity` is reached and expire
//! `ttl` after insertion, whichever comes first. Concurrent misses on the
//! same key share one fetch; errors reach every waiter and are never stored.

use bytes::Bytes;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::{ConfigClientError, ConfigClientResult};
use crate::domain::models::CacheConfig;

/// Cache of raw config values keyed by config key.
///
/// Cloning is cheap and clones share the same storage.
#[derive(Clone)]
pub struct ValueCache {
    fresh: Cache<String, Bytes>,
    /// Last good value per key, kept past the TTL. Only present when stale
    /// fallback is enabled.
    last_known: Option<Cache<String, Bytes>>,
    ttl: Duration,
}

impl ValueCache {
    /// Create a cache with stale fallback disabled.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            fresh: Self::build(capacity, Some(ttl)),
            last_known: None,
            ttl,
        }
    }

    /// Create a cache sized and timed by `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        let cache = Self::new(config.capacity, config.ttl());
        if config.serve_stale_on_error {
            cache.with_stale_fallback(config.capacity)
        } else {
            cache
        }
    }

    /// Keep the last good value of up to `capacity` keys and serve it when a
    /// refresh fails with `RemoteUnavailable`.
    pub fn with_stale_fallback(mut self, capacity: u64) -> Self {
        self.last_known = Some(Self::build(capacity, None));
        self
    }

    fn build(capacity: u64, ttl: Option<Duration>) -> Cache<String, Bytes> {
        let builder = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru());
        match ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        }
    }

    /// Time a value stays fresh after it is loaded.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether stale values are served during an outage.
    pub const fn serves_stale(&self) -> bool {
        self.last_known.is_some()
    }

    /// Return the fresh value for `key`, or run `fetch` to load it.
    ///
    /// `fetch` is only polled on a miss, and only by one caller at a time per
    /// key. A successful load applies pending evictions before returning, so
    /// the cache never holds more than `capacity` entries once this resolves.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> ConfigClientResult<Bytes>
    where
        F: Future<Output = ConfigClientResult<Bytes>>,
    {
        if let Some(value) = self.fresh.get(key).await {
            debug!(key, "config cache hit");
            return Ok(value);
        }

        debug!(key, "config cache miss");
        let last_known = self.last_known.clone();
        let loaded = self
            .fresh
            .try_get_with_by_ref(key, async move {
                let value = fetch.await?;
                if let Some(last_known) = last_known {
                    last_known.insert(key.to_string(), value.clone()).await;
                }
                Ok::<_, ConfigClientError>(value)
            })
            .await;

        match loaded {
            Ok(value) => {
                self.sync().await;
                Ok(value)
            }
            Err(err) => {
                let err = Arc::unwrap_or_clone(err);
                self.stale_or(key, err).await
            }
        }
    }

    async fn stale_or(&self, key: &str, err: ConfigClientError) -> ConfigClientResult<Bytes> {
        if !err.is_transient() {
            return Err(err);
        }
        let Some(last_known) = &self.last_known else {
            return Err(err);
        };
        match last_known.get(key).await {
            Some(value) => {
                warn!(key, error = %err, "config service unavailable, serving stale value");
                Ok(value)
            }
            None => Err(err),
        }
    }

    /// Drop the fresh entry for `key`. The stale copy is kept.
    pub async fn invalidate(&self, key: &str) {
        self.fresh.invalidate(key).await;
    }

    /// Drop every fresh and stale entry.
    pub fn invalidate_all(&self) {
        self.fresh.invalidate_all();
        if let Some(last_known) = &self.last_known {
            last_known.invalidate_all();
        }
    }

    /// Number of fresh entries as of the last load or [`Self::sync`].
    pub fn entry_count(&self) -> u64 {
        self.fresh.entry_count()
    }

    /// Apply pending evictions and expirations now.
    pub async fn sync(&self) {
        self.fresh.run_pending_tasks().await;
        if let Some(last_known) = &self.last_known {
            last_known.run_pending_tasks().await;
        }
    }
}

impl std::fmt::Debug for ValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCache")
            .field("entries", &self.fresh.entry_count())
            .field("ttl", &self.ttl)
            .field("serve_stale", &self.serves_stale())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &'static str) -> ConfigClientResult<Bytes> {
        Ok(Bytes::from_static(text.as_bytes()))
    }

    fn unavailable() -> ConfigClientResult<Bytes> {
        Err(ConfigClientError::unavailable("down"))
    }

    async fn must_not_fetch() -> ConfigClientResult<Bytes> {
        panic!("fresh entry must not be refetched")
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let cache = ValueCache::new(8, Duration::from_secs(60));

        let first = cache.get_or_fetch("db.host", async { value("10.0.0.1") }).await;
        let second = cache.get_or_fetch("db.host", must_not_fetch()).await;

        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = ValueCache::new(8, Duration::from_secs(60));

        let err = cache
            .get_or_fetch("db.host", async { unavailable() })
            .await
            .unwrap_err();
        assert!(err.is_transient());

        let recovered = cache.get_or_fetch("db.host", async { value("10.0.0.1") }).await;
        assert_eq!(recovered.unwrap(), Bytes::from_static(b"10.0.0.1"));
    }

    #[tokio::test]
    async fn test_stale_value_served_only_when_enabled() {
        let ttl = Duration::from_millis(30);

        let strict = ValueCache::new(8, ttl);
        strict.get_or_fetch("k", async { value("v1") }).await.unwrap();
        tokio::time::sleep(ttl * 3).await;
        let result = strict.get_or_fetch("k", async { unavailable() }).await;
        assert!(result.unwrap_err().is_transient());

        let lenient = ValueCache::new(8, ttl).with_stale_fallback(8);
        lenient.get_or_fetch("k", async { value("v1") }).await.unwrap();
        tokio::time::sleep(ttl * 3).await;
        let result = lenient.get_or_fetch("k", async { unavailable() }).await;
        assert_eq!(result.unwrap(), Bytes::from_static(b"v1"));
    }

    #[tokio::test]
    async fn test_stale_fallback_does_not_hide_not_found() {
        let ttl = Duration::from_millis(30);
        let cache = ValueCache::new(8, ttl).with_stale_fallback(8);
        cache.get_or_fetch("k", async { value("v1") }).await.unwrap();
        tokio::time::sleep(ttl * 3).await;

        let result = cache
            .get_or_fetch("k", async { Err::<Bytes, _>(ConfigClientError::not_found("k", "dev")) })
            .await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = ValueCache::new(8, Duration::from_secs(60));
        cache.get_or_fetch("k", async { value("v1") }).await.unwrap();

        cache.invalidate("k").await;
        let refreshed = cache.get_or_fetch("k", async { value("v2") }).await;
        assert_eq!(refreshed.unwrap(), Bytes::from_static(b"v2"));
    }

    #[tokio::test]
    async fn test_capacity_is_enforced_after_each_load() {
        let cache = ValueCache::new(2, Duration::from_secs(60));
        for (key, text) in [("A", "a"), ("B", "b"), ("C", "c")] {
            cache.get_or_fetch(key, async move { value(text) }).await.unwrap();
        }
        assert_eq!(cache.entry_count(), 2);

        let reloaded = cache.get_or_fetch("A", async { value("a2") }).await;
        assert_eq!(reloaded.unwrap(), Bytes::from_static(b"a2"));
        assert_eq!(cache.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = CacheConfig {
            capacity: 4,
            ttl_ms: 1500,
            serve_stale_on_error: true,
            invalidate_on_set: false,
        };
        let cache = ValueCache::from_config(&config);
        assert_eq!(cache.ttl(), Duration::from_millis(1500));
        assert!(cache.serves_stale());
        assert_eq!(cache.entry_count(), 0);
    }
}
