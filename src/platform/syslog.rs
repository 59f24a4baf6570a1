// logsnap - platform/syslog.rs
//
// The system log store: the only module that reads the platform's real
// log source. On Unix-family systems the console log produced by the
// standard logging call lands in the syslog files, so the store reads
// the configured files (plus uncompressed rotated siblings), parses each
// line, and returns the records attributable to the query key.
//
// Per-file failures are non-fatal: a missing or unreadable file simply
// contributes no entries (warning logged). The query errors only when no
// configured log source exists at all.

use crate::core::model::{FilterKey, LogRecord};
use crate::core::store::LogStore;
use crate::util::constants;
use crate::util::error::StoreError;
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use regex::Regex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Compressed rotation suffixes that are never read.
const COMPRESSED_PATTERNS: &[&str] = &["*.gz", "*.xz", "*.bz2", "*.zst"];

/// A file-backed store over the system syslog files.
pub struct SyslogStore {
    /// Primary log files to read. Rotated siblings are discovered per query.
    paths: Vec<PathBuf>,
}

impl SyslogStore {
    /// Store over the platform default log locations.
    pub fn system_default() -> Self {
        Self::with_paths(
            constants::DEFAULT_SYSLOG_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
        )
    }

    /// Store over an explicit set of log files (config override, tests).
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl LogStore for SyslogStore {
    fn query(&self, key: &FilterKey) -> Result<Vec<LogRecord>, StoreError> {
        let existing: Vec<&PathBuf> = self.paths.iter().filter(|p| p.exists()).collect();
        if existing.is_empty() {
            return Err(StoreError::Unavailable {
                reason: format!(
                    "none of the configured log files exist: {}",
                    self.paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }

        // Oldest data first so sequence numbers reflect production order:
        // highest-numbered rotation, down to the live file.
        let mut records: VecDeque<LogRecord> = VecDeque::new();
        let mut sequence: u64 = 0;

        for primary in existing {
            let mut files = rotated_siblings(primary);
            files.push(primary.clone());

            for file in files {
                let content = match read_log_file(&file, constants::MAX_LOG_FILE_BYTES) {
                    Ok(content) => content,
                    Err(e) => {
                        // Non-fatal: an unreadable file contributes no
                        // entries. Rotated siblings vanishing mid-query is
                        // routine, so missing files only log at debug.
                        if matches!(
                            &e,
                            StoreError::Io { source, .. }
                                if source.kind() == std::io::ErrorKind::NotFound
                        ) {
                            tracing::debug!(path = %file.display(), "Log file vanished; skipping");
                        } else {
                            tracing::warn!(error = %e, "Skipping log file");
                        }
                        continue;
                    }
                };
                collect_matching(
                    &content,
                    key,
                    &mut sequence,
                    &mut records,
                    constants::MAX_STORE_RECORDS,
                );
            }
        }

        tracing::debug!(
            key = %key,
            records = records.len(),
            "System log query complete"
        );

        Ok(records.into())
    }
}

/// Read one log file with the size bound enforced.
///
/// Lossy conversion: syslog files occasionally contain non-UTF-8 bytes
/// and a single bad line must not hide the rest of the file.
fn read_log_file(file: &Path, max_bytes: u64) -> Result<String, StoreError> {
    let meta = std::fs::metadata(file).map_err(|e| StoreError::Io {
        path: file.to_path_buf(),
        operation: "stat",
        source: e,
    })?;
    if meta.len() > max_bytes {
        return Err(StoreError::FileTooLarge {
            path: file.to_path_buf(),
            size: meta.len(),
            max_size: max_bytes,
        });
    }

    let bytes = std::fs::read(file).map_err(|e| StoreError::Io {
        path: file.to_path_buf(),
        operation: "read",
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Append the records in `content` that match `key`, assigning sequence
/// numbers in line order.
fn collect_matching(
    content: &str,
    key: &FilterKey,
    sequence: &mut u64,
    records: &mut VecDeque<LogRecord>,
    max_records: usize,
) {
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let seq = *sequence;
        *sequence += 1;

        if let Some(record) = parse_line(line, seq) {
            if key.matches(&record) {
                // The snapshot contract favours recency: drop the oldest
                // record once the bound is hit.
                if records.len() == max_records {
                    records.pop_front();
                }
                records.push_back(record);
            }
        }
    }
}

// =============================================================================
// Rotated sibling discovery
// =============================================================================

/// Uncompressed rotated siblings of `primary` (`syslog.1`, `syslog.2`, ...),
/// ordered oldest first (highest rotation number down to `.1`). At most
/// `MAX_ROTATED_FILES` siblings are returned; the most recent rotations
/// (lowest numbers) are kept when more exist.
fn rotated_siblings(primary: &Path) -> Vec<PathBuf> {
    let (Some(parent), Some(name)) = (primary.parent(), primary.file_name()) else {
        return Vec::new();
    };
    let Some(name) = name.to_str() else {
        return Vec::new();
    };

    // The primary name is literal text, so its glob metacharacters (if
    // any) must be escaped before it lands in the pattern.
    let rotated = match glob::Pattern::new(&format!("{}.[0-9]*", glob::Pattern::escape(name))) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(file = name, error = %e, "Invalid rotation pattern");
            return Vec::new();
        }
    };
    let compressed: Vec<glob::Pattern> = COMPRESSED_PATTERNS
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect();

    let mut siblings: Vec<(u64, PathBuf)> = Vec::new();
    for entry in WalkDir::new(parent)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !rotated.matches(file_name) || compressed.iter().any(|p| p.matches(file_name)) {
            continue;
        }
        // Rotation number is the suffix after the primary name's dot.
        if let Ok(n) = file_name[name.len() + 1..].parse::<u64>() {
            siblings.push((n, entry.path().to_path_buf()));
        }
    }

    // When over the cap, the lowest-numbered (most recent) rotations win;
    // the read order stays oldest first: syslog.3, syslog.2, syslog.1
    siblings.sort_by_key(|(n, _)| *n);
    siblings.truncate(constants::MAX_ROTATED_FILES);
    siblings.reverse();
    siblings.into_iter().map(|(_, p)| p).collect()
}

// =============================================================================
// Line parsing
// =============================================================================

/// Parse one syslog line into a record.
///
/// Two shapes are recognised, via compiled patterns with named capture
/// groups:
///   - BSD syslog (RFC 3164): `Jan 15 14:30:22 host myapp[1234]: message`
///   - ISO-timestamped rsyslog: `2024-01-15T14:30:22.123+00:00 host myapp: message`
///
/// Lines matching neither shape (continuation lines, kernel dumps) yield
/// `None` and are skipped; the retrieval contract models entries as plain
/// rendered strings only.
fn parse_line(line: &str, sequence: u64) -> Option<LogRecord> {
    static BSD_PATTERN: OnceLock<Regex> = OnceLock::new();
    static ISO_PATTERN: OnceLock<Regex> = OnceLock::new();

    let bsd = BSD_PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<timestamp>[A-Z][a-z]{2} [ 0-9]\d \d{2}:\d{2}:\d{2}) \S+ (?P<sender>[^\s\[:]+)(?:\[(?P<pid>\d+)\])?: ?(?P<message>.*)$",
        )
        .expect("BSD syslog pattern is invalid")
    });
    let iso = ISO_PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<timestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?) \S+ (?P<sender>[^\s\[:]+)(?:\[(?P<pid>\d+)\])?: ?(?P<message>.*)$",
        )
        .expect("ISO syslog pattern is invalid")
    });

    let (caps, is_bsd) = if let Some(caps) = iso.captures(line) {
        (caps, false)
    } else if let Some(caps) = bsd.captures(line) {
        (caps, true)
    } else {
        return None;
    };

    let raw_ts = caps.name("timestamp").map(|m| m.as_str())?;
    let timestamp = if is_bsd {
        parse_bsd_timestamp(raw_ts)
    } else {
        parse_iso_timestamp(raw_ts)
    };

    Some(LogRecord {
        timestamp,
        sequence,
        sender: caps.name("sender")?.as_str().to_string(),
        process_id: caps.name("pid").and_then(|m| m.as_str().parse().ok()),
        message: caps.name("message").map(|m| m.as_str().to_string())?,
    })
}

/// Parse a year-less BSD syslog timestamp ("Jan 15 14:30:22") by injecting
/// the current UTC year. Entries written in December but read in January
/// would land a year in the future, so anything more than a day ahead of
/// now is shifted back one year. Best-effort only.
fn parse_bsd_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let now = Utc::now();
    let with_year = format!("{} {raw}", now.year());
    let parsed = NaiveDateTime::parse_from_str(&with_year, "%Y %b %e %H:%M:%S")
        .ok()
        .map(|ndt| ndt.and_utc())?;

    if parsed > now + Duration::days(1) {
        let last_year = format!("{} {raw}", now.year() - 1);
        NaiveDateTime::parse_from_str(&last_year, "%Y %b %e %H:%M:%S")
            .ok()
            .map(|ndt| ndt.and_utc())
    } else {
        Some(parsed)
    }
}

/// Parse an ISO 8601 timestamp, with or without timezone offset.
fn parse_iso_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    // Log4j-style comma millis are normalised before parsing.
    let raw = raw.replace(',', ".");
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Some(dt.into());
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ndt| ndt.and_utc())
}
