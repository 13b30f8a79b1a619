// Copyright 2024-2026 oplog Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-call logging decisions.
//!
//! [`DecisionState`] holds everything an interceptor remembers between calls.
//! The flag and counter are atomic; the timestamp and last result are locked
//! only for a read-and-swap, never across the wrapped call. Under concurrency
//! `ReturnChangedOnly` compares results in completion order, not start order.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::policy::{LoggingMode, Policy};

/// What to log around one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    None,
    /// Skip the before-call line; decide the after-call line from the result.
    AfterOnly,
    BeforeAndAfter,
}

impl LogAction {
    pub fn logs_before(&self) -> bool {
        matches!(self, Self::BeforeAndAfter)
    }
}

/// Mutable decision state of one intercepted operation.
#[derive(Debug)]
pub struct DecisionState {
    policy: Option<Policy>,
    disabled: AtomicBool,
    last_logged_at: Mutex<Option<DateTime<Utc>>>,
    call_count: AtomicU64,
    last_result: Mutex<Option<String>>,
}

impl DecisionState {
    pub fn new(policy: Option<Policy>) -> Self {
        Self {
            policy,
            disabled: AtomicBool::new(false),
            last_logged_at: Mutex::new(None),
            call_count: AtomicU64::new(0),
            last_result: Mutex::new(None),
        }
    }

    /// State that never logs, used when policy resolution failed.
    pub fn failed() -> Self {
        let state = Self::new(None);
        state.disabled.store(true, Ordering::Relaxed);
        state
    }

    pub fn policy(&self) -> Option<Policy> {
        self.policy
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Permanently disable logging. Returns `true` on the first transition.
    pub fn disable(&self) -> bool {
        !self.disabled.swap(true, Ordering::Relaxed)
    }

    /// Number of `MaxCount` evaluations so far.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Decide what to log for the call about to run.
    ///
    /// The clock is only read for `TimeInterval`.
    pub fn decide(&self, clock: &dyn Clock) -> LogAction {
        if self.is_disabled() {
            return LogAction::None;
        }

        let Some(policy) = self.policy else {
            return LogAction::BeforeAndAfter;
        };

        match policy.mode() {
            LoggingMode::Disabled => LogAction::None,
            LoggingMode::ReturnChangedOnly => LogAction::AfterOnly,
            LoggingMode::TimeInterval => self.decide_time_interval(policy.parameter(), clock.now()),
            LoggingMode::MaxCount => self.decide_max_count(policy.parameter()),
            LoggingMode::CountInterval => LogAction::None,
        }
    }

    fn decide_time_interval(&self, seconds: u32, now: DateTime<Utc>) -> LogAction {
        let mut last = self.last_logged_at.lock();
        let due = match *last {
            None => true,
            // Whole seconds of the total elapsed duration.
            Some(stamp) => (now - stamp).num_seconds() > i64::from(seconds),
        };
        if due {
            *last = Some(now);
            LogAction::BeforeAndAfter
        } else {
            LogAction::None
        }
    }

    fn decide_max_count(&self, limit: u32) -> LogAction {
        let previous = self
            .call_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_add(1)))
            .unwrap_or(u64::MAX);
        if previous < u64::from(limit) {
            LogAction::BeforeAndAfter
        } else {
            LogAction::None
        }
    }

    /// Record a result signature; `true` if it differs from the last one.
    pub fn result_changed(&self, signature: String) -> bool {
        let mut last = self.last_result.lock();
        if last.as_deref() == Some(signature.as_str()) {
            return false;
        }
        *last = Some(signature);
        true
    }
}
