//! Diagnostic logging and metrics for the interception layer itself.

mod logging;
pub mod metrics;

pub use self::logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::init_metrics;
