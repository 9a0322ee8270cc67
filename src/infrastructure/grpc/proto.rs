//! Messages and client stub for the `pb.Config` service.
//!
//! Declared by hand with `prost`/`tonic` so the crate builds without
//! `protoc`. The request carries `key = 1`, `value = 2`, `env = 3`; the
//! response carries `value = 1`.

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{GrpcMethod, IntoRequest, Response, Status};

/// Request for both `GetConfig` and `SetConfig`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigRequest {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(bytes = "bytes", tag = "2")]
    pub value: ::prost::bytes::Bytes,
    #[prost(string, tag = "3")]
    pub env: ::prost::alloc::string::String,
}

/// Response carrying the stored value; empty for `SetConfig`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigResponse {
    #[prost(bytes = "bytes", tag = "1")]
    pub value: ::prost::bytes::Bytes,
}

const SERVICE: &str = "pb.Config";
const GET_CONFIG_PATH: &str = "/pb.Config/GetConfig";
const SET_CONFIG_PATH: &str = "/pb.Config/SetConfig";

/// Unary client for `pb.Config`.
///
/// Cloning is cheap: clones share the underlying channel.
#[derive(Debug, Clone)]
pub struct ConfigServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl ConfigServiceClient {
    /// Client over an existing channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// `GetConfig`: read one value.
    pub async fn get_config(
        &mut self,
        request: impl IntoRequest<ConfigRequest>,
    ) -> Result<Response<ConfigResponse>, Status> {
        self.unary(request, GET_CONFIG_PATH, "GetConfig").await
    }

    /// `SetConfig`: write one value.
    pub async fn set_config(
        &mut self,
        request: impl IntoRequest<ConfigRequest>,
    ) -> Result<Response<ConfigResponse>, Status> {
        self.unary(request, SET_CONFIG_PATH, "SetConfig").await
    }

    async fn unary(
        &mut self,
        request: impl IntoRequest<ConfigRequest>,
        path: &'static str,
        method: &'static str,
    ) -> Result<Response<ConfigResponse>, Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("Service was not ready: {e}")))?;

        let codec = tonic::codec::ProstCodec::<ConfigRequest, ConfigResponse>::default();
        let mut request = request.into_request();
        request
            .extensions_mut()
            .insert(GrpcMethod::new(SERVICE, method));

        self.inner
            .unary(request, PathAndQuery::from_static(path), codec)
            .await
    }
}
