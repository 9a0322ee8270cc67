//! gRPC transport for the remote config service
//!
//! - `proto`: `pb.Config` messages and unary client
//! - `transport`: `ConfigTransport` over a shared `tonic` channel

pub mod proto;
pub mod transport;

pub use proto::{ConfigRequest, ConfigResponse, ConfigServiceClient};
pub use transport::GrpcConfigTransport;
