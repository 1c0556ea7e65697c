//! Cache Module
//!
//! Provides in-memory caching with per-entry expiration strategies.

mod entry;
mod handle;
mod stats;
mod store;
mod strategy;


// Re-export public types
pub use entry::{CacheEntry, Deadline, Remaining, MAX_LIFE};
pub use handle::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use strategy::{ExpiryMode, Strategy};
