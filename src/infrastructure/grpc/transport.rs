use async_trait::async_trait;
use bytes::Bytes;
use tonic::transport::Endpoint;
use tonic::{Code, Status};
use tracing::{debug, info, instrument, warn};

use super::proto::{ConfigRequest, ConfigServiceClient};
use crate::domain::errors::{ConfigClientError, ConfigClientResult};
use crate::domain::models::RemoteConfig;
use crate::domain::ports::ConfigTransport;

/// Prefix of the error text the config server returns for a missing key
/// when it reports the miss as a plain `Unknown` status.
const SERVER_NOT_FOUND_PREFIX: &str = "Not found config key";

/// gRPC transport to the `pb.Config` service
///
/// Holds one long-lived channel. The channel dials lazily on first use and
/// reconnects on its own after a dropped connection.
#[derive(Debug, Clone)]
pub struct GrpcConfigTransport {
    client: ConfigServiceClient,
    endpoint: String,
}

impl GrpcConfigTransport {
    /// Build the channel for `remote`
    ///
    /// Must be called from within a tokio runtime. No network traffic
    /// happens until the first request.
    pub fn connect(remote: &RemoteConfig) -> ConfigClientResult<Self> {
        let uri = remote.endpoint();
        let channel = Endpoint::from_shared(uri.clone())
            .map_err(|e| ConfigClientError::InvalidEndpoint(format!("{uri}: {e}")))?
            .connect_timeout(remote.connect_timeout())
            .timeout(remote.request_timeout())
            .tcp_nodelay(true)
            .connect_lazy();

        info!(
            endpoint = %uri,
            connect_timeout_ms = remote.connect_timeout_ms,
            request_timeout_ms = remote.request_timeout_ms,
            "config service channel created"
        );

        Ok(Self {
            client: ConfigServiceClient::new(channel),
            endpoint: uri,
        })
    }

    /// URI the channel dials
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ConfigTransport for GrpcConfigTransport {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, key: &str, env: &str) -> ConfigClientResult<Bytes> {
        let request = ConfigRequest {
            key: key.to_string(),
            value: Bytes::new(),
            env: env.to_string(),
        };

        let response = self
            .client
            .clone()
            .get_config(request)
            .await
            .map_err(|status| map_status(&status, key, env))?;

        let value = response.into_inner().value;
        debug!(bytes = value.len(), "GetConfig succeeded");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(endpoint = %self.endpoint, bytes = value.len()))]
    async fn store(&self, key: &str, value: Bytes, env: &str) -> ConfigClientResult<()> {
        let request = ConfigRequest {
            key: key.to_string(),
            value,
            env: env.to_string(),
        };

        self.client
            .clone()
            .set_config(request)
            .await
            .map_err(|status| map_status(&status, key, env))?;

        debug!("SetConfig acknowledged");
        Ok(())
    }
}

/// Classify a gRPC status into the client's error taxonomy
pub(crate) fn map_status(status: &Status, key: &str, env: &str) -> ConfigClientError {
    // Statuses synthesised from a local transport error carry its source;
    // statuses sent by the server never do.
    if let Some(source) = std::error::Error::source(status) {
        warn!(code = ?status.code(), error = %source, "config service transport error");
        return ConfigClientError::unavailable(format!("{}: {source}", status.message()));
    }

    match status.code() {
        Code::NotFound => ConfigClientError::not_found(key, env),
        Code::Unknown if status.message().starts_with(SERVER_NOT_FOUND_PREFIX) => {
            ConfigClientError::not_found(key, env)
        }
        Code::Unavailable
        | Code::DeadlineExceeded
        | Code::Cancelled
        | Code::ResourceExhausted
        | Code::Aborted => {
            warn!(code = ?status.code(), message = status.message(), "config service unavailable");
            ConfigClientError::unavailable(format!("{:?}: {}", status.code(), status.message()))
        }
        code => ConfigClientError::Rejected {
            code: format!("{code:?}"),
            message: status.message().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = map_status(&Status::not_found("missing"), "db.host", "dev");
        assert_eq!(err, ConfigClientError::not_found("db.host", "dev"));
    }

    #[test]
    fn test_server_not_found_message_maps_to_not_found() {
        let status = Status::unknown("Not found config key:db.host");
        assert!(map_status(&status, "db.host", "dev").is_not_found());

        let status = Status::unknown("panic in handler");
        assert!(matches!(
            map_status(&status, "db.host", "dev"),
            ConfigClientError::Rejected { .. }
        ));
    }

    #[test]
    fn test_transient_statuses() {
        for status in [
            Status::unavailable("connection refused"),
            Status::deadline_exceeded("timeout"),
            Status::cancelled("cancelled"),
            Status::resource_exhausted("slow down"),
            Status::aborted("aborted"),
        ] {
            assert!(map_status(&status, "k", "dev").is_transient());
        }
    }

    #[test]
    fn test_permission_denied_is_rejected() {
        let err = map_status(&Status::permission_denied("no"), "k", "prd");
        assert_eq!(
            err,
            ConfigClientError::Rejected {
                code: "PermissionDenied".to_string(),
                message: "no".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected_at_construction() {
        let remote = RemoteConfig {
            address: "bad host name".to_string(),
            ..Default::default()
        };
        let err = GrpcConfigTransport::connect(&remote).unwrap_err();
        assert!(matches!(err, ConfigClientError::InvalidEndpoint(_)));
        assert!(!err.is_transient());
    }
}
