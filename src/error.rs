//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

use crate::cache::ExpiryMode;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Every variant is a local, recoverable condition. None of them leave the
/// store in a broken state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Operation requires an existing key that is absent
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Add on a key that is already present
    #[error("Key already exists: {0}, use set to update it")]
    AlreadyExists(String),

    /// Set targeting an entry whose deadline has passed
    #[error("Key expired: {0}")]
    Expired(String),

    /// Mode and life do not agree
    #[error("Invalid strategy: mode {mode:?} with life {life:?}")]
    InvalidStrategy { mode: ExpiryMode, life: Duration },

    /// Sweep interval must be non-zero
    #[error("Invalid sweep interval: must be greater than zero")]
    InvalidInterval,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        assert_eq!(
            CacheError::KeyNotFound("k1".to_string()).to_string(),
            "Key not found: k1"
        );
        assert!(CacheError::AlreadyExists("k1".to_string())
            .to_string()
            .contains("use set"));
        assert_eq!(
            CacheError::Expired("k1".to_string()).to_string(),
            "Key expired: k1"
        );
    }

    #[test]
    fn test_invalid_strategy_message() {
        let err = CacheError::InvalidStrategy {
            mode: ExpiryMode::Never,
            life: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "Invalid strategy: mode Never with life 5s");
    }
}
