//! Typed, cached access to remote configuration.
//!
//! Every read goes through [`ValueCache::get_or_fetch`]; on a miss the
//! remote fetch runs under a per-attempt timeout and the read retry policy.
//! Writes go straight to the service, once, and leave the cache alone unless
//! `invalidate_on_set` is enabled.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::adapters::cache::ValueCache;
use crate::domain::errors::{ConfigClientError, ConfigClientResult};
use crate::domain::models::value::{
    decode_bool, decode_int, decode_object, decode_string, encode_object,
};
use crate::domain::models::{CacheConfig, Config};
use crate::domain::ports::ConfigTransport;
use crate::infrastructure::grpc::GrpcConfigTransport;
use crate::infrastructure::retry::RetryPolicy;

/// Client-side view of the config service for one environment.
///
/// Build one per process and hand out clones: clones share the transport
/// and the cache.
#[derive(Clone)]
pub struct ConfigAccessor {
    transport: Arc<dyn ConfigTransport>,
    cache: ValueCache,
    retry: RetryPolicy,
    environment: String,
    request_timeout: Duration,
    invalidate_on_set: bool,
}

impl ConfigAccessor {
    /// Connect to the config service described by `config`
    ///
    /// Must be called from within a tokio runtime. The channel dials on the
    /// first request, so an unreachable service surfaces as
    /// `RemoteUnavailable` from the first read rather than from here.
    pub fn connect(config: &Config) -> ConfigClientResult<Self> {
        let transport = GrpcConfigTransport::connect(&config.remote)?;
        Ok(Self::builder(Arc::new(transport))
            .environment(config.remote.environment.clone())
            .request_timeout(config.remote.request_timeout())
            .cache(&config.cache)
            .retry(RetryPolicy::from_config(&config.retry))
            .build())
    }

    /// Start building an accessor over any transport
    pub fn builder(transport: Arc<dyn ConfigTransport>) -> ConfigAccessorBuilder {
        ConfigAccessorBuilder::new(transport)
    }

    /// Environment label sent with every request
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The cache shared by this accessor and its clones
    pub const fn cache(&self) -> &ValueCache {
        &self.cache
    }

    /// Raw bytes for `key`, served from the cache while fresh
    #[instrument(skip(self), fields(env = %self.environment))]
    pub async fn get_bytes(&self, key: &str) -> ConfigClientResult<Bytes> {
        self.cache.get_or_fetch(key, self.fetch_remote(key)).await
    }

    /// UTF-8 text for `key`
    pub async fn get_string(&self, key: &str) -> ConfigClientResult<String> {
        let raw = self.get_bytes(key).await?;
        decode_string(key, &raw)
    }

    /// Base-10 integer literal for `key`
    pub async fn get_int(&self, key: &str) -> ConfigClientResult<i64> {
        let raw = self.get_bytes(key).await?;
        decode_int(key, &raw)
    }

    /// `true` iff the stored bytes are non-empty
    pub async fn get_bool(&self, key: &str) -> ConfigClientResult<bool> {
        let raw = self.get_bytes(key).await?;
        Ok(decode_bool(&raw))
    }

    /// Structured value for `key`, deserialized from JSON
    pub async fn get_object<T: DeserializeOwned>(&self, key: &str) -> ConfigClientResult<T> {
        let raw = self.get_bytes(key).await?;
        decode_object(key, &raw)
    }

    /// Structured value for `key` as a dynamic JSON tree
    pub async fn get_value(&self, key: &str) -> ConfigClientResult<serde_json::Value> {
        self.get_object(key).await
    }

    /// Write `value` for `key`
    ///
    /// Sent at most once: a failed write is returned to the caller and never
    /// retried. A cached value for `key` stays in place for up to one TTL
    /// unless the accessor was built with `invalidate_on_set`.
    #[instrument(skip(self, value), fields(env = %self.environment))]
    pub async fn set(&self, key: &str, value: impl Into<Bytes>) -> ConfigClientResult<()> {
        let value = value.into();
        let bytes = value.len();

        let result = match tokio::time::timeout(
            self.request_timeout,
            self.transport.store(key, value, &self.environment),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error("SetConfig")),
        };

        match &result {
            Ok(()) => {
                info!(bytes, "config value written");
                if self.invalidate_on_set {
                    self.cache.invalidate(key).await;
                }
            }
            Err(err) => warn!(error = %err, "config write failed"),
        }

        result
    }

    /// JSON-encode `value` and write it for `key`
    pub async fn set_object<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> ConfigClientResult<()> {
        let raw = encode_object(key, value)?;
        self.set(key, raw).await
    }

    /// Drop the cached value for `key` so the next read goes to the service
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop every cached value
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    async fn fetch_remote(&self, key: &str) -> ConfigClientResult<Bytes> {
        self.retry
            .execute(|| async move {
                debug!(key, env = %self.environment, "fetching config from service");
                match tokio::time::timeout(
                    self.request_timeout,
                    self.transport.fetch(key, &self.environment),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(self.timeout_error("GetConfig")),
                }
            })
            .await
    }

    fn timeout_error(&self, method: &str) -> ConfigClientError {
        ConfigClientError::unavailable(format!(
            "{method} timed out after {}ms",
            self.request_timeout.as_millis()
        ))
    }
}

impl std::fmt::Debug for ConfigAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigAccessor")
            .field("environment", &self.environment)
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .field("invalidate_on_set", &self.invalidate_on_set)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConfigAccessor`] with the same defaults as [`Config`]
pub struct ConfigAccessorBuilder {
    transport: Arc<dyn ConfigTransport>,
    environment: String,
    request_timeout: Duration,
    cache: Option<ValueCache>,
    cache_config: CacheConfig,
    retry: RetryPolicy,
}

impl ConfigAccessorBuilder {
    fn new(transport: Arc<dyn ConfigTransport>) -> Self {
        let defaults = Config::default();
        Self {
            transport,
            environment: defaults.remote.environment.clone(),
            request_timeout: defaults.remote.request_timeout(),
            cache: None,
            cache_config: defaults.cache,
            retry: RetryPolicy::from_config(&defaults.retry),
        }
    }

    /// Environment label for every request
    #[must_use]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Timeout for a single remote attempt
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Size, TTL and coherence settings for the cache
    #[must_use]
    pub fn cache(mut self, config: &CacheConfig) -> Self {
        self.cache_config = config.clone();
        self.cache = None;
        self
    }

    /// Use a prebuilt cache; `invalidate_on_set` still comes from [`Self::cache`]
    #[must_use]
    pub fn with_value_cache(mut self, cache: ValueCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Retry policy for reads
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Finish the accessor
    pub fn build(self) -> ConfigAccessor {
        let cache = self
            .cache
            .unwrap_or_else(|| ValueCache::from_config(&self.cache_config));

        info!(
            env = %self.environment,
            capacity = self.cache_config.capacity,
            ttl_ms = u64::try_from(cache.ttl().as_millis()).unwrap_or(u64::MAX),
            serve_stale = cache.serves_stale(),
            "config accessor ready"
        );

        ConfigAccessor {
            transport: self.transport,
            cache,
            retry: self.retry,
            environment: self.environment,
            request_timeout: self.request_timeout,
            invalidate_on_set: self.cache_config.invalidate_on_set,
        }
    }
}
