// logsnap - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logsnap";

/// Application identifier used for config directories.
pub const APP_ID: &str = "logsnap";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// System log store
// =============================================================================

/// System log files queried by default, in priority order. Debian-family
/// systems write the console log to syslog, RHEL-family to messages.
pub const DEFAULT_SYSLOG_PATHS: &[&str] = &["/var/log/syslog", "/var/log/messages"];

/// Maximum size in bytes of a single log file the store will read.
/// Larger files are skipped with a warning so a runaway log cannot
/// exhaust memory.
pub const MAX_LOG_FILE_BYTES: u64 = 256 * 1024 * 1024; // 256 MB

/// Maximum number of uncompressed rotated siblings (`syslog.1`,
/// `syslog.2`, ...) included per configured log file.
pub const MAX_ROTATED_FILES: usize = 8;

/// Maximum records a single store query may return. Once the cap is
/// reached the oldest records are dropped first, since the snapshot
/// contract favours recency.
pub const MAX_STORE_RECORDS: usize = 1_000_000;

// =============================================================================
// Snapshot limits
// =============================================================================

/// Default maximum number of entries in a retrieved snapshot.
pub const DEFAULT_MAX_SNAPSHOT_ENTRIES: usize = 10_000;

/// Minimum user-configurable snapshot entry cap.
pub const MIN_MAX_SNAPSHOT_ENTRIES: usize = 1;

/// Hard upper bound on the snapshot entry cap (prevents configuration
/// mistakes).
pub const ABSOLUTE_MAX_SNAPSHOT_ENTRIES: usize = MAX_STORE_RECORDS;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
