//! Infrastructure layer module
//!
//! This module contains the integrations with the outside world:
//! - gRPC transport to the config service (tonic)
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Retry policy for remote reads
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod grpc;
pub mod logging;
pub mod retry;

pub use grpc::GrpcConfigTransport;
pub use retry::RetryPolicy;
