use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};

/// Default number of records kept by a [`MemorySink`].
pub const DEFAULT_MEMORY_CAPACITY: usize = 1024;

/// Bounded in-memory ring of the most recent records.
///
/// Writing past capacity silently evicts the oldest record. Meant for tests
/// and introspection, not for delivery.
#[derive(Debug)]
pub struct MemorySink {
    capacity: usize,
    records: Mutex<VecDeque<LogRecord>>,
}

impl MemorySink {
    /// Create a ring holding at most `capacity` records. A capacity of zero
    /// is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Most recently written record.
    pub fn latest(&self) -> Option<LogRecord> {
        self.lock().back().cloned()
    }

    /// Oldest record still retained.
    pub fn oldest(&self) -> Option<LogRecord> {
        self.lock().front().cloned()
    }

    /// Snapshot of the retained records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().iter().cloned().collect()
    }

    /// Retained messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Every mutation finishes before the guard drops, so a poisoned ring is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut records = self.lock();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
        Ok(())
    }
}
