//! Service layer: the typed config accessor callers depend on.

pub mod config_accessor;

pub use config_accessor::{ConfigAccessor, ConfigAccessorBuilder};
