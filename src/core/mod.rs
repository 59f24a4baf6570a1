// logsnap - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, or any I/O crate directly.

pub mod collector;
pub mod model;
pub mod store;
