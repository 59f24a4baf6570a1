// logsnap - core/collector.rs
//
// The log retriever: a fixed filter key over a log store, exposing one
// operation -- retrieve the matching entries as strings, newest first.
// Core layer: pure logic, no I/O; the store behind the trait does the
// actual reading.

use crate::core::model::{FilterKey, LogRecord, RetrieveOptions};
use crate::core::store::LogStore;
use std::cmp::Ordering;

/// Behaviour of an object that collects console logs.
pub trait LogCollector {
    /// Retrieve and return logs as an ordered list of strings, sorted by
    /// descending recency (most recent entry first). No matching entries
    /// yields an empty list.
    fn retrieve_logs(&self) -> Vec<String>;
}

/// A log retriever scoped to a single immutable filter key.
///
/// Constructed with exactly one key -- a bundle identifier or a sender
/// name; there is no keyless construction path. The retriever holds no
/// state beyond the key and the store handle, and every retrieval
/// produces a fresh snapshot.
pub struct SystemLogCollector {
    key: FilterKey,
    store: Box<dyn LogStore>,
}

impl SystemLogCollector {
    /// Create a retriever scoped to entries attributed to `identifier`.
    pub fn by_bundle_identifier(
        identifier: impl Into<String>,
        store: impl LogStore + 'static,
    ) -> Self {
        Self {
            key: FilterKey::BundleIdentifier(identifier.into()),
            store: Box::new(store),
        }
    }

    /// Create a retriever scoped to entries attributed to `name`.
    pub fn by_sender_name(name: impl Into<String>, store: impl LogStore + 'static) -> Self {
        Self {
            key: FilterKey::SenderName(name.into()),
            store: Box::new(store),
        }
    }

    /// The filter key this retriever was constructed with.
    pub fn key(&self) -> &FilterKey {
        &self.key
    }

    /// Retrieve the matching records, newest first, with `options` applied.
    ///
    /// A store failure is not surfaced to the caller: the platform log
    /// facility being unavailable has a defined empty-result fallback, so
    /// the failure is logged and an empty snapshot returned.
    pub fn retrieve_records(&self, options: &RetrieveOptions) -> Vec<LogRecord> {
        let mut records = match self.store.query(&self.key) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Log store query failed; returning empty snapshot"
                );
                return Vec::new();
            }
        };

        if let Some(since) = options.since {
            // Records without a timestamp cannot satisfy a time bound.
            records.retain(|r| matches!(r.timestamp, Some(ts) if ts >= since));
        }

        sort_newest_first(&mut records);
        records.truncate(options.max_entries);
        records
    }

    /// Retrieve logs as strings with `options` applied.
    pub fn retrieve_logs_with(&self, options: &RetrieveOptions) -> Vec<String> {
        self.retrieve_records(options)
            .into_iter()
            .map(|r| r.message)
            .collect()
    }
}

impl LogCollector for SystemLogCollector {
    fn retrieve_logs(&self) -> Vec<String> {
        self.retrieve_logs_with(&RetrieveOptions::default())
    }
}

/// Sort records by descending recency: newest timestamp first, sequence
/// number breaking ties. Records without a timestamp sort after all
/// timestamped records, newest-appended first.
fn sort_newest_first(records: &mut [LogRecord]) {
    records.sort_by(|a, b| match (&a.timestamp, &b.timestamp) {
        (Some(ta), Some(tb)) => tb.cmp(ta).then_with(|| b.sequence.cmp(&a.sequence)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.sequence.cmp(&a.sequence),
    });
}
