//! In-memory ring buffer sink

use crate::core::{LogRecord, LogSink, Result, Severity, SourceLocation};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A line captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub line: String,
    pub category: String,
    pub severity: Severity,
    pub location: SourceLocation,
}

/// Keeps the most recent `capacity` lines; older ones are evicted.
///
/// Useful for tests, crash reports and in-process log viewers.
pub struct MemorySink {
    name: String,
    capacity: usize,
    records: Mutex<VecDeque<CapturedRecord>>,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self::with_name("memory", capacity)
    }

    pub fn with_name(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of captured records, oldest first.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Snapshot of captured lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.line.clone()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records.lock().iter().any(|r| r.line.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn receive(&self, record: &LogRecord<'_>) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }

        let mut records = self.records.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(CapturedRecord {
            line: record.line.to_string(),
            category: record.category.name().to_string(),
            severity: record.severity,
            location: record.location,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
