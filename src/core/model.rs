// logsnap - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;

// =============================================================================
// Filter key
// =============================================================================

/// The identifying key a retriever is scoped to, fixed at construction.
///
/// Exactly one form is active per retriever. Modelling the choice as an enum
/// (rather than two optional fields) makes the invalid states -- both set or
/// neither set -- unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKey {
    /// Scope retrieval to entries attributed to this bundle identifier
    /// (e.g. "com.example.myapp").
    BundleIdentifier(String),

    /// Scope retrieval to entries attributed to this sender (the process
    /// or tag name that produced the entry).
    SenderName(String),
}

impl FilterKey {
    /// Returns true if `record` is attributable to this key.
    ///
    /// A sender name matches the record's sender exactly. A bundle
    /// identifier matches either the full identifier or its final
    /// dot-separated component, since Unix processes log under their
    /// short name rather than a reverse-DNS identifier.
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Self::SenderName(name) => record.sender == *name,
            Self::BundleIdentifier(id) => {
                if record.sender == *id {
                    return true;
                }
                match id.rsplit('.').next() {
                    Some(short) if !short.is_empty() => record.sender == short,
                    _ => false,
                }
            }
        }
    }

    /// The raw key string, for logging and display.
    pub fn as_str(&self) -> &str {
        match self {
            Self::BundleIdentifier(id) => id,
            Self::SenderName(name) => name,
        }
    }
}

impl std::fmt::Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BundleIdentifier(id) => write!(f, "bundle identifier '{id}'"),
            Self::SenderName(name) => write!(f, "sender '{name}'"),
        }
    }
}

// =============================================================================
// Log record
// =============================================================================

/// A single console log entry as produced by a log store.
///
/// Carries just enough metadata to attribute the entry to a key and to
/// sort by recency; the retrieval surface exposes only the message text.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// Entry timestamp in UTC. `None` if the source line had no parseable
    /// timestamp (such records sort after all timestamped ones).
    pub timestamp: Option<DateTime<Utc>>,

    /// Ingest order within a single store query. Monotonically increasing
    /// in production order, so it breaks recency ties between entries
    /// logged within the same timestamp granularity.
    pub sequence: u64,

    /// Name of the process or tag that produced the entry.
    pub sender: String,

    /// Process id, when the source recorded one.
    pub process_id: Option<u32>,

    /// The rendered message text.
    pub message: String,
}

// =============================================================================
// Retrieve options
// =============================================================================

/// Optional bounds applied to a retrieval call.
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    /// Only include entries at or after this instant. `None` = all entries.
    /// Entries without a timestamp are excluded when a bound is set.
    pub since: Option<DateTime<Utc>>,

    /// Maximum number of entries in the snapshot. The newest entries win
    /// when the cap is exceeded.
    pub max_entries: usize,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            since: None,
            max_entries: constants::DEFAULT_MAX_SNAPSHOT_ENTRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sender: &str) -> LogRecord {
        LogRecord {
            timestamp: None,
            sequence: 0,
            sender: sender.to_string(),
            process_id: None,
            message: "msg".to_string(),
        }
    }

    #[test]
    fn test_sender_name_exact_match() {
        let key = FilterKey::SenderName("myapp".to_string());
        assert!(key.matches(&record("myapp")));
        assert!(!key.matches(&record("otherapp")));
        assert!(!key.matches(&record("myapp2")));
    }

    #[test]
    fn test_bundle_identifier_full_match() {
        let key = FilterKey::BundleIdentifier("com.example.myapp".to_string());
        assert!(key.matches(&record("com.example.myapp")));
    }

    #[test]
    fn test_bundle_identifier_short_name_match() {
        let key = FilterKey::BundleIdentifier("com.example.myapp".to_string());
        assert!(key.matches(&record("myapp")));
        assert!(!key.matches(&record("example")));
        assert!(!key.matches(&record("com.example")));
    }

    #[test]
    fn test_bundle_identifier_without_dots() {
        // A dotless identifier behaves like an exact tag match.
        let key = FilterKey::BundleIdentifier("myapp".to_string());
        assert!(key.matches(&record("myapp")));
        assert!(!key.matches(&record("yourapp")));
    }

    #[test]
    fn test_trailing_dot_does_not_match_everything() {
        let key = FilterKey::BundleIdentifier("com.example.".to_string());
        assert!(!key.matches(&record("")));
        assert!(!key.matches(&record("anything")));
    }

    #[test]
    fn test_default_options() {
        let opts = RetrieveOptions::default();
        assert!(opts.since.is_none());
        assert_eq!(
            opts.max_entries,
            crate::util::constants::DEFAULT_MAX_SNAPSHOT_ENTRIES
        );
    }
}
