//! Runtime-wide configuration, errors, and the driver that ties the
//! coordinator, worker pool, and sandbox pool together for one run.

mod config;
mod driver;
mod errors;

pub use config::{SystemConfig, SystemConfigBuilder, DEFAULT_LIVENESS_LOG_INTERVAL, DEFAULT_POLL_INTERVAL};
pub use driver::{RunReport, RuntimeDriver};
pub use errors::RuntimeError;
