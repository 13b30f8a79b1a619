// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults.
//!
//! These commands read configuration directly from environment variables.

use crate::config::{self, EffectiveConfig, DEFAULT_ACTOR, DEFAULT_LOG_LEVEL, DEFAULT_MEMORY_SINK_CAPACITY};
use crate::sink::DEFAULT_CHANNEL;
use crate::telemetry::LogFormat;

/// Print effective config as key-value pairs to stdout.
pub fn run_show() {
    let cfg = config::load().effective_config();
    for line in config_lines(&cfg) {
        println!("{}", line);
    }
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    for line in config_lines(&default_config()) {
        println!("{}", line);
    }
}

fn default_config() -> EffectiveConfig {
    EffectiveConfig {
        log_level: DEFAULT_LOG_LEVEL.to_string(),
        log_format: LogFormat::default().as_str().to_string(),
        log_file: None,
        channel: DEFAULT_CHANNEL.to_string(),
        policy_file: None,
        default_actor: DEFAULT_ACTOR.to_string(),
        memory_sink_capacity: DEFAULT_MEMORY_SINK_CAPACITY,
    }
}

fn config_lines(cfg: &EffectiveConfig) -> Vec<String> {
    vec![
        format!("OPLOG_LOG_LEVEL={}", cfg.log_level),
        format!("OPLOG_LOG_FORMAT={}", cfg.log_format),
        format!("OPLOG_LOG_FILE={}", cfg.log_file.as_deref().unwrap_or("")),
        format!("OPLOG_CHANNEL={}", cfg.channel),
        format!("OPLOG_POLICY_FILE={}", cfg.policy_file.as_deref().unwrap_or("")),
        format!("OPLOG_DEFAULT_ACTOR={}", cfg.default_actor),
        format!("OPLOG_MEMORY_SINK_CAPACITY={}", cfg.memory_sink_capacity),
    ]
}
