//! Metric names and descriptions.
//!
//! Counters are emitted through the `metrics` facade; without an installed
//! recorder they are no-ops.

use metrics::{describe_counter, Unit};

/// Call log lines written, labelled by `phase` (`before` / `after`).
pub const LOG_LINES_TOTAL: &str = "oplog_log_lines_total";
/// Logging path failures, labelled by `kind` (`format`, `identity`, `sink`, `panic`, `resolve`).
pub const LOGGING_FAILURES_TOTAL: &str = "oplog_logging_failures_total";
/// Interceptors attached to dispatch tables.
pub const INTERCEPTORS_ATTACHED_TOTAL: &str = "oplog_interceptors_attached_total";

/// Register metric descriptions with the installed recorder.
pub fn init_metrics() {
    describe_counter!(LOG_LINES_TOTAL, Unit::Count, "Call log lines written");
    describe_counter!(
        LOGGING_FAILURES_TOTAL,
        Unit::Count,
        "Failures that permanently disabled call logging for an operation"
    );
    describe_counter!(
        INTERCEPTORS_ATTACHED_TOTAL,
        Unit::Count,
        "Logging interceptors attached to service operations"
    );
}
