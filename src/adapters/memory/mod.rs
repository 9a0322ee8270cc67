//! In-memory config transport for tests and local development.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::errors::{ConfigClientError, ConfigClientResult};
use crate::domain::ports::ConfigTransport;

/// Transport backed by a map of `(env, key) -> value`.
///
/// Records how often each key was fetched so callers can observe cache
/// behaviour, and can be switched to a failing state to simulate an outage.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    values: RwLock<HashMap<(String, String), Bytes>>,
    fetches: RwLock<HashMap<String, u64>>,
    stores: AtomicU64,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryTransport {
    /// Empty transport with no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Wrap in an `Arc` for handing to an accessor.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Seed a value without counting it as a store.
    pub async fn insert(&self, env: &str, key: &str, value: impl Into<Bytes>) {
        let mut values = self.values.write().await;
        values.insert((env.to_string(), key.to_string()), value.into());
    }

    /// Delete a value so later fetches miss.
    pub async fn remove(&self, env: &str, key: &str) {
        let mut values = self.values.write().await;
        values.remove(&(env.to_string(), key.to_string()));
    }

    /// Current stored value, without counting a fetch.
    pub async fn value(&self, env: &str, key: &str) -> Option<Bytes> {
        let values = self.values.read().await;
        values.get(&(env.to_string(), key.to_string())).cloned()
    }

    /// Make every call fail with `RemoteUnavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of fetches issued for `key`, across environments.
    pub async fn fetch_count(&self, key: &str) -> u64 {
        let fetches = self.fetches.read().await;
        fetches.get(key).copied().unwrap_or(0)
    }

    /// Number of fetches issued for all keys.
    pub async fn total_fetches(&self) -> u64 {
        let fetches = self.fetches.read().await;
        fetches.values().sum()
    }

    /// Number of stores attempted, failed ones included.
    pub fn store_count(&self) -> u64 {
        self.stores.load(Ordering::SeqCst)
    }

    async fn simulate_network(&self) -> ConfigClientResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ConfigClientError::unavailable("in-memory transport is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigTransport for InMemoryTransport {
    async fn fetch(&self, key: &str, env: &str) -> ConfigClientResult<Bytes> {
        {
            let mut fetches = self.fetches.write().await;
            *fetches.entry(key.to_string()).or_insert(0) += 1;
        }
        self.simulate_network().await?;

        self.value(env, key)
            .await
            .ok_or_else(|| ConfigClientError::not_found(key, env))
    }

    async fn store(&self, key: &str, value: Bytes, env: &str) -> ConfigClientResult<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;

        self.insert(env, key, value).await;
        Ok(())
    }
}
