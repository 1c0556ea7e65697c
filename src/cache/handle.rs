//! Shared Cache Handle
//!
//! Lock-guarded, cloneable handle around a [`CacheStore`] that owns the
//! background sweeper for its whole lifetime.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::cache::{CacheStats, CacheStore, Deadline, Remaining, Strategy};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper, SweeperState};

// == Cache ==
/// Thread-safe cache with per-entry expiration strategies.
///
/// All operations, including each sweep, take one store-wide lock, so at most
/// one of them runs at a time. Clones share the same entries and sweeper.
///
/// The sweeper stops when any of these happens:
/// - [`Cache::stop`] or [`Cache::shutdown`] is called
/// - the token passed to the constructor is cancelled
/// - the last clone of the cache is dropped
///
/// # Example
/// ```rust,no_run
/// use std::time::Duration;
/// use expiry_cache::{Cache, Strategy};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> expiry_cache::error::Result<()> {
///     let cache = Cache::new(Duration::from_millis(500), CancellationToken::new())?;
///
///     cache.add("session", "abc".to_string(), Strategy::auto(Duration::from_secs(120))).await?;
///     assert_eq!(cache.get("session").await.as_deref(), Some("abc"));
///
///     cache.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct Cache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    token: CancellationToken,
    state: watch::Receiver<SweeperState>,
    sweep_interval: Duration,
    _sweeper_guard: Arc<DropGuard>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            token: self.token.clone(),
            state: self.state.clone(),
            sweep_interval: self.sweep_interval,
            _sweeper_guard: Arc::clone(&self._sweeper_guard),
        }
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("sweep_interval", &self.sweep_interval)
            .field("sweeper_state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and starts its sweeper.
    ///
    /// The sweeper listens on a child of `token`: cancelling `token` stops it,
    /// while stopping this cache leaves `token` untouched.
    ///
    /// # Errors
    /// Returns `InvalidInterval` if `sweep_interval` is zero.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn new(sweep_interval: Duration, token: CancellationToken) -> Result<Self> {
        if sweep_interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }

        let store = Arc::new(Mutex::new(CacheStore::new()));
        let token = token.child_token();
        let (state_tx, state_rx) = watch::channel(SweeperState::Running);

        spawn_sweeper(Arc::clone(&store), sweep_interval, token.clone(), state_tx);

        Ok(Self {
            store,
            _sweeper_guard: Arc::new(token.clone().drop_guard()),
            token,
            state: state_rx,
            sweep_interval,
        })
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config, token: CancellationToken) -> Result<Self> {
        Self::new(config.sweep_interval, token)
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    ///
    /// Missing and expired keys both read as None. Use
    /// [`Cache::get_remaining`] to tell them apart.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key)
    }

    /// Returns the time left for `key`; does not evict.
    pub async fn get_remaining(&self, key: &str) -> Result<Remaining> {
        self.store.lock().await.get_remaining(key)
    }

    /// Returns the deadline for `key`; does not evict.
    pub async fn get_deadline(&self, key: &str) -> Result<Deadline> {
        self.store.lock().await.get_deadline(key)
    }

    // == Add ==
    /// Inserts a new entry with the given strategy. Never overwrites.
    pub async fn add(&self, key: impl Into<String>, value: V, strategy: Strategy) -> Result<()> {
        self.store.lock().await.add(key, value, strategy)
    }

    /// Inserts a permanent entry.
    pub async fn add_default(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.store.lock().await.add_default(key, value)
    }

    // == Set ==
    /// Replaces the value of an existing, unexpired entry.
    pub async fn set(&self, key: &str, value: V) -> Result<()> {
        self.store.lock().await.set(key, value)
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.lock().await.delete(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    /// Number of entries, counting expired ones not yet reclaimed.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

impl<V> Cache<V> {
    // == Lifecycle ==
    /// Signals the sweeper to stop. Returns immediately.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Signals the sweeper to stop and waits until it has.
    pub async fn shutdown(&self) {
        self.token.cancel();

        let mut state = self.state.clone();
        // A dropped sender means the task is gone either way
        let _ = state
            .wait_for(|current| *current == SweeperState::Stopped)
            .await;
    }

    pub fn sweeper_state(&self) -> SweeperState {
        *self.state.borrow()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache() -> Cache<String> {
        Cache::new(Duration::from_millis(500), CancellationToken::new()).unwrap()
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let result: Result<Cache<String>> = Cache::new(Duration::ZERO, CancellationToken::new());
        assert_eq!(result.unwrap_err(), CacheError::InvalidInterval);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = Config::default().with_sweep_interval(Duration::from_secs(2));
        let cache: Cache<u8> = Cache::from_config(&config, CancellationToken::new()).unwrap();

        assert_eq!(cache.sweep_interval(), Duration::from_secs(2));
        assert_eq!(cache.sweeper_state(), SweeperState::Running);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = test_cache();
        let other = cache.clone();

        cache.add_default("shared", "v".to_string()).await.unwrap();

        assert_eq!(other.get("shared").await, Some("v".to_string()));
        assert_eq!(other.len().await, 1);
        assert!(other.delete("shared").await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeper() {
        let cache = test_cache();

        cache.shutdown().await;

        assert_eq!(cache.sweeper_state(), SweeperState::Stopped);
        // Foreground operations keep working without the sweeper
        cache.add_default("k", "v".to_string()).await.unwrap();
        assert_eq!(cache.get("k").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_parent_token_stops_sweeper() {
        let parent = CancellationToken::new();
        let cache: Cache<String> = Cache::new(Duration::from_millis(500), parent.clone()).unwrap();

        parent.cancel();
        cache.shutdown().await;

        assert_eq!(cache.sweeper_state(), SweeperState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_leaves_parent_token_alone() {
        let parent = CancellationToken::new();
        let cache: Cache<String> = Cache::new(Duration::from_millis(500), parent.clone()).unwrap();

        cache.stop();
        cache.shutdown().await;

        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropping_last_clone_stops_sweeper() {
        let cache = test_cache();
        let mut state = cache.state.clone();
        let other = cache.clone();

        drop(cache);
        assert_eq!(*state.borrow(), SweeperState::Running);

        drop(other);
        state
            .wait_for(|current| *current == SweeperState::Stopped)
            .await
            .unwrap();
    }
}
