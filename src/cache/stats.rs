//! Cache Statistics Module
//!
//! Tracks reads and the two ways expired entries get reclaimed.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of reads that returned a value
    pub hits: u64,
    /// Number of reads that found nothing (missing or expired)
    pub misses: u64,
    /// Lazy entries reclaimed by a get or set
    pub lazy_evictions: u64,
    /// Auto entries reclaimed by the sweeper
    pub sweep_evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_lazy_eviction(&mut self) {
        self.lazy_evictions += 1;
    }

    pub fn record_sweep_evictions(&mut self, count: usize) {
        self.sweep_evictions += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
