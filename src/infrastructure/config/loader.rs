use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment label cannot be empty")]
    EmptyEnvironment,

    #[error("Config service address cannot be empty")]
    EmptyAddress,

    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid cache capacity: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),

    #[error("Invalid cache ttl_ms: {0}. Must be positive")]
    InvalidCacheTtl(u64),

    #[error("Invalid request_timeout_ms: {0}. Must be positive")]
    InvalidRequestTimeout(u64),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .remote-config/config.yaml
    /// 3. .remote-config/local.yaml (optional local overrides)
    /// 4. Environment variables (REMOTE_CONFIG_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".remote-config/config.yaml"))
            .merge(Yaml::file(".remote-config/local.yaml"))
            .merge(Env::prefixed("REMOTE_CONFIG_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("REMOTE_CONFIG_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let remote = &config.remote;
        if remote.environment.trim().is_empty() {
            return Err(ConfigError::EmptyEnvironment);
        }
        if remote.address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if remote.port == 0 {
            return Err(ConfigError::InvalidPort(remote.port));
        }
        if remote.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidRequestTimeout(remote.request_timeout_ms));
        }

        if config.cache.capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(config.cache.capacity));
        }
        if config.cache.ttl_ms == 0 {
            return Err(ConfigError::InvalidCacheTtl(config.cache.ttl_ms));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
