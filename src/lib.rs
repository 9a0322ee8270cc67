//! Remote Config - typed, cached client for a central configuration service
//!
//! Fetches and sets key/value configuration entries over gRPC, decodes
//! values as strings, integers, booleans or JSON objects, and keeps an
//! in-process TTL cache in front of the service.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): errors, settings, value decoding, transport port
//! - **Service Layer** (`services`): the `ConfigAccessor`
//! - **Adapters** (`adapters`): value cache and in-memory transport
//! - **Infrastructure Layer** (`infrastructure`): gRPC, config loading, logging, retry
//!
//! # Example
//!
//! ```no_run
//! use remote_config::{ConfigAccessor, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let accessor = ConfigAccessor::connect(&config)?;
//!
//!     let pool_size = accessor.get_int("db.pool_size").await?;
//!     println!("pool size: {pool_size}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{InMemoryTransport, ValueCache};
pub use domain::models::{CacheConfig, Config, LoggingConfig, RemoteConfig, RetryConfig};
pub use domain::{ConfigClientError, ConfigClientResult, ConfigTransport};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{LogConfig, LoggerImpl};
pub use infrastructure::{GrpcConfigTransport, RetryPolicy};
pub use services::{ConfigAccessor, ConfigAccessorBuilder};
