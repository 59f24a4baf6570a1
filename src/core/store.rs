// logsnap - core/store.rs
//
// The log store capability: "query entries matching key K".
//
// Only the platform layer implements this against a real system log
// source; every other caller depends on the trait, so a seeded in-memory
// store can stand in for the platform during tests and embedding.

use crate::core::model::{FilterKey, LogRecord};
use crate::util::error::StoreError;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// A queryable source of console log entries.
///
/// Implementations return the records attributable to `key` together with
/// enough metadata (timestamp + sequence) for the caller to sort by
/// recency. The returned order is unspecified; ordering is owned by the
/// retriever so every store yields a consistently sorted snapshot.
pub trait LogStore: Send + Sync {
    /// Return all records matching `key`.
    ///
    /// "No matching entries" is a valid `Ok(vec![])` result, never an
    /// error. `Err` is reserved for a store that cannot be queried at all.
    fn query(&self, key: &FilterKey) -> Result<Vec<LogRecord>, StoreError>;
}

impl<S: LogStore + ?Sized> LogStore for std::sync::Arc<S> {
    fn query(&self, key: &FilterKey) -> Result<Vec<LogRecord>, StoreError> {
        (**self).query(key)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// A seedable in-process log store.
///
/// Appending is interior-mutable so a store shared between retrievers can
/// keep receiving entries, matching how a live system log behaves.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: Vec<LogRecord>,
    next_sequence: u64,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Sequence numbers are assigned in append order.
    pub fn append(
        &self,
        sender: &str,
        timestamp: Option<DateTime<Utc>>,
        message: &str,
    ) {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.records.push(LogRecord {
            timestamp,
            sequence,
            sender: sender.to_string(),
            process_id: None,
            message: message.to_string(),
        });
    }

    /// Number of entries currently held, regardless of sender.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("memory store lock poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogStore for MemoryLogStore {
    fn query(&self, key: &FilterKey) -> Result<Vec<LogRecord>, StoreError> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        Ok(inner
            .records
            .iter()
            .filter(|r| key.matches(r))
            .cloned()
            .collect())
    }
}
