use crate::property::PropertyRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Append-only, lock-protected collection of extracted records
///
/// Order is completion order of detail-page parsing.
#[derive(Debug, Default)]
pub struct RecordSink {
    records: Mutex<Vec<PropertyRecord>>,
    count: AtomicUsize,
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns the new length
    pub fn append(&self, record: PropertyRecord) -> usize {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.push(record);
        let len = records.len();
        self.count.store(len, Ordering::Release);
        len
    }

    /// Number of records appended so far, readable without taking the lock
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Copy of the records in append order
    pub fn snapshot(&self) -> Vec<PropertyRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consumes the sink, handing the records over without a copy
    pub fn into_records(self) -> Vec<PropertyRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
