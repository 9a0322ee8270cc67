use async_trait::async_trait;
use bytes::Bytes;

use super::errors::ConfigClientResult;

/// Transport interface to the remote config service
///
/// This trait is the only contract the accessor needs from the RPC layer.
/// Implementations must be cheap to share across tasks; the accessor holds
/// one behind an `Arc` for the lifetime of the process.
#[async_trait]
pub trait ConfigTransport: Send + Sync {
    /// Fetch the raw value of `key` in `env`
    ///
    /// # Returns
    /// * `Ok(bytes)` - The stored value, possibly empty
    /// * `Err(NotFound)` - The service has no value for `(key, env)`
    /// * `Err(RemoteUnavailable)` - Connection or transport failure
    async fn fetch(&self, key: &str, env: &str) -> ConfigClientResult<Bytes>;

    /// Store `value` for `key` in `env`
    ///
    /// Called at most once per `set`; implementations must not retry on
    /// their own.
    async fn store(&self, key: &str, value: Bytes, env: &str) -> ConfigClientResult<()>;
}
