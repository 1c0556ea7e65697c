//! Expiration Strategy Module
//!
//! Describes how (and whether) an entry is reclaimed once its life runs out.

use std::time::Duration;

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Expiry Mode ==
/// How an expired entry gets reclaimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExpiryMode {
    /// The entry never expires; only an explicit delete removes it.
    #[default]
    Never,
    /// Expired entries are removed by the background sweeper.
    Auto,
    /// Expired entries are removed by the next get or set that touches them.
    Lazy,
}

// == Strategy ==
/// Eviction policy attached to an entry at creation time.
///
/// Fields are public, so an inconsistent pair can be built; it is rejected by
/// [`Strategy::validate`] when the entry is added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Strategy {
    pub mode: ExpiryMode,
    pub life: Duration,
}

impl Strategy {
    /// Permanent entry.
    pub fn never() -> Self {
        Self::default()
    }

    /// Entry swept by the background task once `life` has elapsed.
    pub fn auto(life: Duration) -> Self {
        Self {
            mode: ExpiryMode::Auto,
            life,
        }
    }

    /// Entry reclaimed on access once `life` has elapsed.
    pub fn lazy(life: Duration) -> Self {
        Self {
            mode: ExpiryMode::Lazy,
            life,
        }
    }

    // == Validate ==
    /// Checks that mode and life agree.
    ///
    /// `Never` requires a zero life, every other mode a non-zero one.
    pub fn validate(&self) -> Result<()> {
        let valid = match self.mode {
            ExpiryMode::Never => self.life.is_zero(),
            ExpiryMode::Auto | ExpiryMode::Lazy => !self.life.is_zero(),
        };

        if valid {
            Ok(())
        } else {
            Err(CacheError::InvalidStrategy {
                mode: self.mode,
                life: self.life,
            })
        }
    }
}
