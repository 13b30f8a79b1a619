//! Configuration loading from environment variables.
//!
//! All configuration values are loaded from `OPLOG_*` environment variables
//! with sensible defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `OPLOG_LOG_LEVEL` | info | Diagnostic log filter |
//! | `OPLOG_LOG_FORMAT` | json | `json`, `pretty` or `compact` |
//! | `OPLOG_LOG_FILE` | (stderr) | Diagnostic log output file |
//! | `OPLOG_CHANNEL` | OperationInvoker | Channel name on call log records |
//! | `OPLOG_POLICY_FILE` | (none) | TOML policy file |
//! | `OPLOG_DEFAULT_ACTOR` | anonymous | Actor reported when none is bound |
//! | `OPLOG_MEMORY_SINK_CAPACITY` | 10000 | Records kept by the in-memory sink |

use std::path::PathBuf;

use crate::policy::{PolicyFileError, PolicyRegistry};
use crate::sink::{MemorySink, DEFAULT_CHANNEL};
use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ACTOR: &str = "anonymous";
pub const DEFAULT_MEMORY_SINK_CAPACITY: usize = 10_000;

/// Effective configuration summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<String>,
    pub channel: String,
    pub policy_file: Option<String>,
    pub default_actor: String,
    pub memory_sink_capacity: usize,
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub logging: LogConfig,
    pub channel: String,
    pub policy_file: Option<PathBuf>,
    pub default_actor: String,
    pub memory_sink_capacity: usize,
}

/// Read a non-empty env var.
fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load diagnostic logging configuration from environment.
fn load_log_config() -> LogConfig {
    let format = non_empty("OPLOG_LOG_FORMAT")
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let level = non_empty("OPLOG_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let output_path = non_empty("OPLOG_LOG_FILE").map(PathBuf::from);
    LogConfig {
        format,
        level,
        output_path,
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    let capacity = parse_usize("OPLOG_MEMORY_SINK_CAPACITY", DEFAULT_MEMORY_SINK_CAPACITY);

    EnvConfig {
        logging: load_log_config(),
        channel: non_empty("OPLOG_CHANNEL").unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
        policy_file: non_empty("OPLOG_POLICY_FILE").map(PathBuf::from),
        default_actor: non_empty("OPLOG_DEFAULT_ACTOR").unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
        memory_sink_capacity: capacity.max(1),
    }
}

impl EnvConfig {
    /// Registry from `OPLOG_POLICY_FILE`, or an empty one when unset.
    pub fn policy_registry(&self) -> Result<PolicyRegistry, PolicyFileError> {
        match &self.policy_file {
            Some(path) => PolicyRegistry::load(path),
            None => Ok(PolicyRegistry::new()),
        }
    }

    /// In-memory sink sized by `OPLOG_MEMORY_SINK_CAPACITY`.
    pub fn memory_sink(&self) -> MemorySink {
        MemorySink::new(self.memory_sink_capacity)
    }

    /// Return a printable summary of all effective values.
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            log_level: self.logging.level.clone(),
            log_format: self.logging.format.as_str().to_string(),
            log_file: self
                .logging
                .output_path
                .as_ref()
                .map(|p| p.display().to_string()),
            channel: self.channel.clone(),
            policy_file: self.policy_file.as_ref().map(|p| p.display().to_string()),
            default_actor: self.default_actor.clone(),
            memory_sink_capacity: self.memory_sink_capacity,
        }
    }
}
