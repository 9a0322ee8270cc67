pub mod config;
pub mod value;

pub use config::{CacheConfig, Config, LoggingConfig, RemoteConfig, RetryConfig};
