//! Expiry Cache - An in-process key/value store with expiring entries
//!
//! Each entry carries a strategy deciding how it is reclaimed once its life
//! runs out: never, by a background sweeper, or lazily on access.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Deadline, ExpiryMode, Remaining, Strategy};
pub use config::Config;
pub use error::CacheError;
pub use tasks::SweeperState;
