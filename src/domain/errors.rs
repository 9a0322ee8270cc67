//! Domain errors for the remote config client.

use thiserror::Error;

/// Errors surfaced by config reads and writes.
///
/// The type is `Clone` because a single failed fetch is handed to every
/// caller that was waiting on the same cache miss.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigClientError {
    /// Transport failure, connection failure, or timeout talking to the service.
    #[error("Config service unavailable: {reason}")]
    RemoteUnavailable {
        /// What went wrong on the wire
        reason: String,
    },

    /// The service has no value for this key in this environment.
    #[error("Config key not found: {key} (env: {env})")]
    NotFound {
        /// Requested key
        key: String,
        /// Environment the key was looked up in
        env: String,
    },

    /// The raw bytes could not be read as the requested type.
    #[error("Cannot decode config key {key} as {target}: {reason}")]
    Decode {
        /// Key whose value failed to decode
        key: String,
        /// Requested type: `string`, `integer` or `object`
        target: &'static str,
        /// Decoder error message
        reason: String,
    },

    /// The service answered with a status that is neither a miss nor an outage.
    #[error("Config service rejected request ({code}): {message}")]
    Rejected {
        /// gRPC status code name
        code: String,
        /// Status message from the service
        message: String,
    },

    /// The configured endpoint cannot be turned into a channel.
    #[error("Invalid config service endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ConfigClientError {
    /// Transient failure reaching the service
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            reason: reason.into(),
        }
    }

    /// No value for `key` in `env`
    pub fn not_found(key: impl Into<String>, env: impl Into<String>) -> Self {
        Self::NotFound {
            key: key.into(),
            env: env.into(),
        }
    }

    /// Bytes for `key` are not a valid `target`
    pub fn decode(key: impl Into<String>, target: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            key: key.into(),
            target,
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error is transient and the read may be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RemoteUnavailable { .. })
    }

    /// Returns true if the service has no value for the key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type ConfigClientResult<T> = Result<T, ConfigClientError>;
