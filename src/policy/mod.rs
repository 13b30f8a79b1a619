// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-operation logging policies.
//!
//! A [`Policy`] is attached to an operation once, when the service pipeline is
//! built, and is never mutated afterwards. Lookup goes through a
//! [`PolicySource`]; the stock source is [`PolicyRegistry`], which can be
//! populated in code or from a TOML policy file.

mod file;
mod registry;

pub use file::{PolicyEntry, PolicyFile, PolicyFileError};
pub use registry::{OperationKey, PolicyRegistry, PolicySource, ResolveError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logging mode selected by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingMode {
    /// Never log.
    Disabled,
    /// Log at most once per `parameter` seconds.
    TimeInterval,
    /// Declared for configuration compatibility; logs nothing.
    CountInterval,
    /// Log the first `parameter` calls, then never again.
    MaxCount,
    /// Log the result only when it differs from the last logged one.
    ReturnChangedOnly,
}

impl LoggingMode {
    pub const ALL: [LoggingMode; 5] = [
        Self::Disabled,
        Self::TimeInterval,
        Self::CountInterval,
        Self::MaxCount,
        Self::ReturnChangedOnly,
    ];

    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::TimeInterval => "time_interval",
            Self::CountInterval => "count_interval",
            Self::MaxCount => "max_count",
            Self::ReturnChangedOnly => "return_changed_only",
        }
    }

    /// Whether the decision engine implements this mode.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::CountInterval)
    }

    /// Whether `parameter` carries meaning for this mode.
    pub fn uses_parameter(&self) -> bool {
        matches!(self, Self::TimeInterval | Self::CountInterval | Self::MaxCount)
    }
}

impl fmt::Display for LoggingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown logging mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for LoggingMode {
    type Err = UnknownMode;

    /// Accepts `max_count`, `max-count`, `MaxCount` and other spellings that
    /// differ only in case and separators. `disable` is accepted for `disabled`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "disabled" | "disable" => Ok(Self::Disabled),
            "timeinterval" => Ok(Self::TimeInterval),
            "countinterval" => Ok(Self::CountInterval),
            "maxcount" => Ok(Self::MaxCount),
            "returnchangedonly" => Ok(Self::ReturnChangedOnly),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for LoggingMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable logging configuration for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Policy {
    mode: LoggingMode,
    #[serde(default)]
    parameter: u32,
}

impl Policy {
    pub fn new(mode: LoggingMode, parameter: u32) -> Self {
        Self { mode, parameter }
    }

    pub fn disabled() -> Self {
        Self::new(LoggingMode::Disabled, 0)
    }

    /// Log at most once every `seconds` seconds.
    pub fn time_interval(seconds: u32) -> Self {
        Self::new(LoggingMode::TimeInterval, seconds)
    }

    pub fn count_interval(count: u32) -> Self {
        Self::new(LoggingMode::CountInterval, count)
    }

    /// Log the first `count` calls only.
    pub fn max_count(count: u32) -> Self {
        Self::new(LoggingMode::MaxCount, count)
    }

    pub fn return_changed_only() -> Self {
        Self::new(LoggingMode::ReturnChangedOnly, 0)
    }

    pub fn mode(&self) -> LoggingMode {
        self.mode
    }

    pub fn parameter(&self) -> u32 {
        self.parameter
    }

    pub fn is_disabled(&self) -> bool {
        self.mode == LoggingMode::Disabled
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode.uses_parameter() {
            write!(f, "{}({})", self.mode, self.parameter)
        } else {
            write!(f, "{}", self.mode)
        }
    }
}
