//! Destinations for call log lines.
//!
//! Storage, rotation and shipping belong to the host; a [`LogSink`] only has to
//! accept a finished [`LogRecord`] or report why it could not.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default log channel name.
pub const DEFAULT_CHANNEL: &str = "OperationInvoker";

/// Which side of the call a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    Before,
    After,
}

impl CallPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

/// One informational call log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub phase: CallPhase,
    pub operation: String,
    pub actor: String,
    pub message: String,
}

/// Errors raised when a sink cannot accept a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("Log sink unavailable: {0}")]
    Unavailable(String),

    #[error("Log sink rejected record: {0}")]
    Rejected(String),
}

/// Receiver of call log records.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Forwards records to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        tracing::info!(
            target: "oplog::calls",
            channel = %record.channel,
            operation = %record.operation,
            phase = record.phase.as_str(),
            actor = %record.actor,
            "{}",
            record.message
        );
        Ok(())
    }
}

/// Bounded in-memory sink; the oldest records are dropped past capacity.
#[derive(Debug)]
pub struct MemorySink {
    capacity: usize,
    records: Mutex<VecDeque<LogRecord>>,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Messages only, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn records_for_phase(&self, phase: CallPhase) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.phase == phase)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Export buffered records as a JSON array.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        let records = self.records.lock();
        serde_json::to_string_pretty(&*records)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut records = self.records.lock();
        records.push_back(record.clone());
        while records.len() > self.capacity {
            records.pop_front();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str, phase: CallPhase) -> LogRecord {
        LogRecord {
            timestamp: Utc::now(),
            channel: DEFAULT_CHANNEL.to_string(),
            phase,
            operation: "GetBalance".to_string(),
            actor: "alice".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_memory_sink_stores_records() {
        let sink = MemorySink::default();
        sink.write(&record("first", CallPhase::Before)).unwrap();
        sink.write(&record("second", CallPhase::After)).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.records_for_phase(CallPhase::After).len(), 1);
    }

    #[test]
    fn test_memory_sink_drops_oldest_past_capacity() {
        let sink = MemorySink::new(3);
        for i in 0..5 {
            sink.write(&record(&format!("m{}", i), CallPhase::Before)).unwrap();
        }
        assert_eq!(sink.messages(), vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_memory_sink_capacity_floor() {
        assert_eq!(MemorySink::new(0).capacity(), 1);
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemorySink::default();
        sink.write(&record("x", CallPhase::Before)).unwrap();
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_export_json() {
        let sink = MemorySink::default();
        sink.write(&record("Calling GetBalance()", CallPhase::Before)).unwrap();

        let json = sink.export_json().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("Calling GetBalance()"));
        assert!(json.contains("\"before\""));
    }

    #[test]
    fn test_tracing_sink_accepts_without_subscriber() {
        let sink = TracingSink;
        assert!(sink.write(&record("hello", CallPhase::After)).is_ok());
    }

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::Unavailable("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
    }
}
