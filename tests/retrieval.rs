// logsnap - tests/retrieval.rs
//
// End-to-end tests for the retrieval pipeline.
//
// These tests exercise the real filesystem, real syslog line parsing,
// and real chrono timestamp parsing through the platform store -- no
// mocks. This exercises the full path from a raw log file on disk to an
// ordered snapshot of message strings.

use logsnap::core::collector::{LogCollector, SystemLogCollector};
use logsnap::core::model::RetrieveOptions;
use logsnap::platform::syslog::SyslogStore;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A store over a single freshly-written log file in `dir`.
fn store_over(dir: &tempfile::TempDir, name: &str, content: &str) -> SyslogStore {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    SyslogStore::with_paths(vec![path])
}

// =============================================================================
// Filtering
// =============================================================================

/// A sender-scoped retriever returns only that sender's entries.
#[test]
fn e2e_sender_retrieval_filters_other_senders() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_over(
        &dir,
        "app.log",
        "2024-01-15T14:30:00+00:00 host myapp[10]: first\n\
         2024-01-15T14:30:01+00:00 host otherapp[11]: not mine\n\
         2024-01-15T14:30:02+00:00 host myapp[10]: second\n",
    );

    let sut = SystemLogCollector::by_sender_name("myapp", store);
    let logs = sut.retrieve_logs();

    assert_eq!(logs, vec!["second", "first"]);
}

/// A bundle-identifier-scoped retriever matches the tag's short name.
#[test]
fn e2e_bundle_identifier_matches_short_name_tag() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_over(
        &dir,
        "app.log",
        "2024-01-15T14:30:00+00:00 host myapp[10]: mine\n\
         2024-01-15T14:30:01+00:00 host example[11]: not mine\n",
    );

    let sut = SystemLogCollector::by_bundle_identifier("com.example.myapp", store);
    assert_eq!(sut.retrieve_logs(), vec!["mine"]);
}

/// Two retrievers with different keys over the same store see disjoint sets.
#[test]
fn e2e_disjoint_keys_over_shared_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(store_over(
        &dir,
        "app.log",
        "2024-01-15T14:30:00+00:00 host appa[1]: a-entry\n\
         2024-01-15T14:30:01+00:00 host appb[2]: b-entry\n",
    ));

    let a = SystemLogCollector::by_sender_name("appa", Arc::clone(&store));
    let b = SystemLogCollector::by_sender_name("appb", Arc::clone(&store));

    assert_eq!(a.retrieve_logs(), vec!["a-entry"]);
    assert_eq!(b.retrieve_logs(), vec!["b-entry"]);
}

// =============================================================================
// Ordering
// =============================================================================

/// Snapshot is sorted newest first even when the file is not.
#[test]
fn e2e_snapshot_is_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_over(
        &dir,
        "app.log",
        "2024-01-15T14:30:05+00:00 host myapp: middle\n\
         2024-01-15T14:30:09+00:00 host myapp: newest\n\
         2024-01-15T14:30:01+00:00 host myapp: oldest\n",
    );

    let sut = SystemLogCollector::by_sender_name("myapp", store);
    assert_eq!(sut.retrieve_logs(), vec!["newest", "middle", "oldest"]);
}

/// Rotated siblings merge with the live file; recency ordering holds
/// across file boundaries.
#[test]
fn e2e_rotated_files_merge_into_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let primary = dir.path().join("syslog");
    fs::write(
        dir.path().join("syslog.2"),
        "2024-01-15T10:00:00+00:00 host myapp: from rotation 2\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("syslog.1"),
        "2024-01-15T11:00:00+00:00 host myapp: from rotation 1\n",
    )
    .unwrap();
    fs::write(
        &primary,
        "2024-01-15T12:00:00+00:00 host myapp: from live file\n",
    )
    .unwrap();

    let sut = SystemLogCollector::by_sender_name("myapp", SyslogStore::with_paths(vec![primary]));
    assert_eq!(
        sut.retrieve_logs(),
        vec!["from live file", "from rotation 1", "from rotation 2"]
    );
}

/// With more rotations than the store will read, the newest ones survive.
#[test]
fn e2e_rotation_cap_drops_the_oldest_rotations() {
    let dir = tempfile::tempdir().unwrap();
    let primary = dir.path().join("syslog");
    for n in 1..=10u32 {
        // Rotation n is n hours older than the live file.
        fs::write(
            dir.path().join(format!("syslog.{n}")),
            format!("2024-01-15T{:02}:00:00+00:00 host myapp: from rotation {n}\n", 12 - n),
        )
        .unwrap();
    }
    fs::write(
        &primary,
        "2024-01-15T12:00:00+00:00 host myapp: from live file\n",
    )
    .unwrap();

    let sut = SystemLogCollector::by_sender_name("myapp", SyslogStore::with_paths(vec![primary]));
    let logs = sut.retrieve_logs();

    assert_eq!(logs.first().map(String::as_str), Some("from live file"));
    assert!(logs.contains(&"from rotation 1".to_string()));
    assert!(logs.contains(&"from rotation 8".to_string()));
    assert!(!logs.contains(&"from rotation 9".to_string()));
    assert!(!logs.contains(&"from rotation 10".to_string()));
}

// =============================================================================
// Empty-result contract
// =============================================================================

/// No matching entries is an empty snapshot, not an error.
#[test]
fn e2e_no_matches_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_over(
        &dir,
        "app.log",
        "2024-01-15T14:30:00+00:00 host otherapp: not mine\n",
    );

    let sut = SystemLogCollector::by_sender_name("myapp", store);
    assert!(sut.retrieve_logs().is_empty());
}

/// A structurally unavailable log source falls back to an empty snapshot.
#[test]
fn e2e_missing_log_source_returns_empty() {
    let store = SyslogStore::with_paths(vec![PathBuf::from(
        "/nonexistent/logsnap-e2e-test-path/syslog",
    )]);

    let sut = SystemLogCollector::by_sender_name("myapp", store);
    assert!(sut.retrieve_logs().is_empty());
}

// =============================================================================
// Options
// =============================================================================

/// --since and --limit style bounds applied through RetrieveOptions.
#[test]
fn e2e_since_and_limit_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_over(
        &dir,
        "app.log",
        "2024-01-15T14:30:00+00:00 host myapp: entry 0\n\
         2024-01-15T14:30:01+00:00 host myapp: entry 1\n\
         2024-01-15T14:30:02+00:00 host myapp: entry 2\n\
         2024-01-15T14:30:03+00:00 host myapp: entry 3\n",
    );
    let sut = SystemLogCollector::by_sender_name("myapp", store);

    let since = "2024-01-15T14:30:01Z".parse().unwrap();
    let opts = RetrieveOptions {
        since: Some(since),
        max_entries: 2,
    };

    // entries 1..=3 pass the time bound; the cap keeps the newest two.
    assert_eq!(sut.retrieve_logs_with(&opts), vec!["entry 3", "entry 2"]);
}

// =============================================================================
// Fixture parse
// =============================================================================

/// Fixture walk-through: ISO entries, a continuation line, BSD entries.
#[test]
fn e2e_fixture_webapp_entries() {
    let store = SyslogStore::with_paths(vec![fixture("syslog_sample.log")]);
    let sut = SystemLogCollector::by_sender_name("webapp", store);
    let logs = sut.retrieve_logs();

    // 4 webapp lines; the stack-trace continuation line matches no shape
    // and is skipped.
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[0], "Connection closed");
    assert_eq!(logs[3], "Server listening on port 8080");
    assert!(!logs.iter().any(|l| l.contains("cron")));
}

/// BSD-format fixture entries share a timestamp; ingest order breaks the
/// tie so the later line is the more recent one.
#[test]
fn e2e_fixture_bsd_entries_tie_broken_by_ingest_order() {
    let store = SyslogStore::with_paths(vec![fixture("syslog_sample.log")]);
    let sut = SystemLogCollector::by_sender_name("backupd", store);

    assert_eq!(
        sut.retrieve_logs(),
        vec!["Backup completed in 0.4s", "Starting scheduled backup"]
    );
}
