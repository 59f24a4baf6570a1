// logsnap - lib.rs
//
// Library entry point. The CLI binary lives in main.rs and is not part
// of the library surface.

pub mod core;
pub mod platform;
pub mod util;

pub use crate::core::collector::{LogCollector, SystemLogCollector};
pub use crate::core::model::{FilterKey, LogRecord, RetrieveOptions};
pub use crate::core::store::{LogStore, MemoryLogStore};
