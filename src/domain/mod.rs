//! Domain layer for the remote config client
//!
//! Errors, settings, value decoding and the transport port.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ConfigClientError, ConfigClientResult};
pub use ports::ConfigTransport;
