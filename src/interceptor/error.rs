// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Failures of the logging path.
//!
//! None of these ever reach the caller of an intercepted operation: the
//! interceptor folds them into its permanently-disabled state.

use thiserror::Error;

use crate::identity::IdentityError;
use crate::sink::SinkError;

/// A step of producing a call log line failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogFailure {
    #[error("Failed to format log message")]
    Format,

    #[error("Actor lookup failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("Log sink write failed: {0}")]
    Sink(#[from] SinkError),

    #[error("Logging step panicked")]
    Panicked,
}

impl From<std::fmt::Error> for LogFailure {
    fn from(_: std::fmt::Error) -> Self {
        Self::Format
    }
}

impl LogFailure {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Identity(_) => "identity",
            Self::Sink(_) => "sink",
            Self::Panicked => "panic",
        }
    }
}
