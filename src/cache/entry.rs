//! Cache Entry Module
//!
//! Defines a stored value together with its deadline and eviction strategy.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::cache::{ExpiryMode, Strategy};
use crate::error::Result;

/// Upper bound on an entry's life, keeps deadline arithmetic from overflowing.
pub const MAX_LIFE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Deadline ==
/// Point in time after which an entry is expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deadline {
    /// No deadline; the entry never expires.
    Never,
    /// Expired at or after this instant.
    At(Instant),
}

impl Deadline {
    /// Returns the deadline instant, or None if there is none.
    pub fn instant(&self) -> Option<Instant> {
        match self {
            Deadline::Never => None,
            Deadline::At(at) => Some(*at),
        }
    }

    /// Projects the deadline onto the wall clock.
    ///
    /// Deadlines are tracked on the monotonic clock, so the result is only as
    /// accurate as the current offset between the two clocks.
    pub fn as_utc(&self) -> Option<DateTime<Utc>> {
        let at = self.instant()?;
        let now = Instant::now();
        let wall = Utc::now();

        if at >= now {
            let ahead = chrono::Duration::from_std(at - now).ok()?;
            wall.checked_add_signed(ahead)
        } else {
            let behind = chrono::Duration::from_std(now - at).ok()?;
            wall.checked_sub_signed(behind)
        }
    }
}

// == Remaining ==
/// Time left before an entry expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Remaining {
    /// The entry has no deadline.
    Unlimited,
    /// Time left, zero once the deadline has passed.
    Finite(Duration),
}

impl Remaining {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Remaining::Unlimited)
    }

    /// Returns the remaining duration, or None when unlimited.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Remaining::Unlimited => None,
            Remaining::Finite(left) => Some(*left),
        }
    }
}

// == Cache Entry ==
/// A single stored value with its expiration contract.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    deadline: Deadline,
    strategy: Strategy,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry whose deadline is `now + strategy.life`.
    ///
    /// # Errors
    /// Returns `InvalidStrategy` if the mode and life do not agree.
    pub fn new(value: V, strategy: Strategy, now: Instant) -> Result<Self> {
        strategy.validate()?;

        let deadline = match strategy.mode {
            ExpiryMode::Never => Deadline::Never,
            ExpiryMode::Auto | ExpiryMode::Lazy => Deadline::At(now + strategy.life.min(MAX_LIFE)),
        };

        Ok(Self {
            value,
            deadline,
            strategy,
        })
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn mode(&self) -> ExpiryMode {
        self.strategy.mode
    }

    // == Has Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches its deadline.
    /// Never-mode entries are never expired. This does not evict anything.
    pub fn has_expired(&self, now: Instant) -> bool {
        if self.strategy.mode == ExpiryMode::Never {
            return false;
        }
        match self.deadline {
            Deadline::Never => false,
            Deadline::At(at) => now >= at,
        }
    }

    // == Remaining ==
    /// Returns the time left at `now`, clamped to zero once expired.
    pub fn remaining(&self, now: Instant) -> Remaining {
        match self.deadline {
            Deadline::Never => Remaining::Unlimited,
            Deadline::At(at) => Remaining::Finite(at.saturating_duration_since(now)),
        }
    }

    /// Swaps in a new value, keeping the deadline and strategy.
    pub fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }
}
