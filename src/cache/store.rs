//! Cache Store Module
//!
//! Key to entry map implementing every foreground operation and the sweep scan.
//! The store itself is not synchronized; [`crate::cache::Cache`] puts it behind
//! a lock and shares it with the sweeper.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats, Deadline, ExpiryMode, Remaining, Strategy};
use crate::error::{CacheError, Result};

/// Outcome of looking a key up at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Missing,
    Expired,
    Live,
}

// == Cache Store ==
/// Main cache storage with per-entry expiration strategies.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Activity counters
    stats: CacheStats,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns None for both missing and expired keys. An expired lazy entry
    /// is evicted by this call; an expired auto entry is left for the sweeper.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let value = match self.lookup(key, Instant::now()) {
            Lookup::Live => self.entries.get(key).map(|entry| entry.value().clone()),
            Lookup::Missing | Lookup::Expired => None,
        };

        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    // == Get Remaining ==
    /// Returns the time left for `key` without evicting anything.
    pub fn get_remaining(&self, key: &str) -> Result<Remaining> {
        self.entries
            .get(key)
            .map(|entry| entry.remaining(Instant::now()))
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))
    }

    // == Get Deadline ==
    /// Returns the deadline for `key` without evicting anything.
    pub fn get_deadline(&self, key: &str) -> Result<Deadline> {
        self.entries
            .get(key)
            .map(CacheEntry::deadline)
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))
    }

    // == Add ==
    /// Inserts a new entry; never overwrites.
    ///
    /// # Errors
    /// - `AlreadyExists` if the key is present, whatever its state
    /// - `InvalidStrategy` if the strategy's mode and life disagree
    pub fn add(&mut self, key: impl Into<String>, value: V, strategy: Strategy) -> Result<()> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(CacheError::AlreadyExists(key));
        }

        let entry = CacheEntry::new(value, strategy, Instant::now())?;
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Add Default ==
    /// Inserts a permanent entry; only [`CacheStore::delete`] removes it.
    pub fn add_default(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        self.add(key, value, Strategy::never())
    }

    // == Set ==
    /// Replaces the value of an existing entry, keeping its deadline and strategy.
    ///
    /// # Errors
    /// - `KeyNotFound` if the key is absent
    /// - `Expired` if the entry's deadline has passed; a lazy entry is evicted
    pub fn set(&mut self, key: &str, value: V) -> Result<()> {
        match self.lookup(key, Instant::now()) {
            Lookup::Missing => Err(CacheError::KeyNotFound(key.to_string())),
            Lookup::Expired => Err(CacheError::Expired(key.to_string())),
            Lookup::Live => {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.replace_value(value);
                }
                Ok(())
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Sweep Expired ==
    /// Removes every auto entry whose deadline has passed.
    ///
    /// Lazy and never entries are left alone. Returns the number removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();

        self.entries
            .retain(|_, entry| !(entry.mode() == ExpiryMode::Auto && entry.has_expired(now)));

        let removed = before - self.entries.len();
        self.stats.record_sweep_evictions(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns true if an entry, expired or not, occupies `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classifies `key` at `now`, evicting it if it is an expired lazy entry.
    fn lookup(&mut self, key: &str, now: Instant) -> Lookup {
        let mode = match self.entries.get(key) {
            None => return Lookup::Missing,
            Some(entry) if !entry.has_expired(now) => return Lookup::Live,
            Some(entry) => entry.mode(),
        };

        if mode == ExpiryMode::Lazy {
            self.entries.remove(key);
            self.stats.record_lazy_eviction();
            self.stats.set_total_entries(self.entries.len());
        }
        Lookup::Expired
    }
}
