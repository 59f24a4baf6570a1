// logsnap - platform/mod.rs
//
// Platform abstraction layer: the system log source and config loading.
// The rest of the crate depends on core::store::LogStore, never on the
// platform log format directly.

pub mod config;
pub mod syslog;
