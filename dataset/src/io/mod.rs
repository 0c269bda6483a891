//! I/O helpers for dataset ingestion.

pub mod loader;
pub mod locator;
