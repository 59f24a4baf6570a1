// logsnap - util/error.rs
//
// Typed errors with context-preserving chains. No string-based error
// propagation; the causal chain survives for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors related to querying a log store.
///
/// Per-file failures inside the system store are non-fatal: the store
/// logs them and the affected file contributes no entries. A query-level
/// error means the store could not be queried at all; the retriever maps
/// that to its defined empty-result fallback.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading a log source.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// A log file exceeds the maximum size the store will read.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The store backend is structurally unavailable on this platform
    /// (no readable log source exists at all).
    Unavailable { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Log file '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Unavailable { reason } => {
                write!(f, "Log store unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
