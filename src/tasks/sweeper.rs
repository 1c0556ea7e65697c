//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired auto entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::cache::CacheStore;

// == Sweeper State ==
/// Lifecycle of a sweeper. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    Running,
    Stopped,
}

/// Spawns a background task that sweeps expired auto entries every `interval`.
///
/// The first sweep happens one full interval after spawning. The task runs
/// until `token` is cancelled, then publishes [`SweeperState::Stopped`] on
/// `state_tx` and releases its timer.
///
/// # Arguments
/// * `store` - Shared store, locked for the duration of each sweep
/// * `interval` - Period between sweeps, must be non-zero
/// * `token` - Cancellation signal that ends the loop
/// * `state_tx` - Channel used to report the sweeper's state
///
/// # Panics
/// Panics if `interval` is zero or if called outside a Tokio runtime.
pub fn spawn_sweeper<V>(
    store: Arc<Mutex<CacheStore<V>>>,
    interval: Duration,
    token: CancellationToken,
    state_tx: watch::Sender<SweeperState>,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::spawn(async move {
        info!("Starting expiry sweeper with interval of {:?}", interval);

        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = store.lock().await.sweep_expired();

                    if removed > 0 {
                        debug!("Expiry sweep: removed {} expired entries", removed);
                    } else {
                        trace!("Expiry sweep: no expired entries found");
                    }
                }
            }
        }

        state_tx.send_replace(SweeperState::Stopped);
        info!("Expiry sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Strategy;

    fn spawn_test_sweeper(
        store: Arc<Mutex<CacheStore<&'static str>>>,
        token: CancellationToken,
    ) -> (JoinHandle<()>, watch::Receiver<SweeperState>) {
        let (state_tx, state_rx) = watch::channel(SweeperState::Running);
        let handle = spawn_sweeper(store, Duration::from_millis(500), token, state_tx);
        (handle, state_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_auto_entries() {
        let store = Arc::new(Mutex::new(CacheStore::new()));
        store
            .lock()
            .await
            .add("expire_soon", "value", Strategy::auto(Duration::from_secs(1)))
            .unwrap();

        let token = CancellationToken::new();
        let (handle, _state_rx) = spawn_test_sweeper(store.clone(), token.clone());

        tokio::time::sleep(Duration::from_millis(1600)).await;

        assert!(
            !store.lock().await.contains_key("expire_soon"),
            "Expired entry should have been swept"
        );

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_leaves_lazy_and_live_entries() {
        let store = Arc::new(Mutex::new(CacheStore::new()));
        {
            let mut guard = store.lock().await;
            guard.add("lazy", "value", Strategy::lazy(Duration::from_secs(1))).unwrap();
            guard.add("long_lived", "value", Strategy::auto(Duration::from_secs(3600))).unwrap();
            guard.add_default("never", "value").unwrap();
        }

        let token = CancellationToken::new();
        let (handle, _state_rx) = spawn_test_sweeper(store.clone(), token.clone());

        tokio::time::sleep(Duration::from_secs(5)).await;

        {
            let guard = store.lock().await;
            assert_eq!(guard.len(), 3);
            assert_eq!(guard.stats().sweep_evictions, 0);
        }

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_on_cancel() {
        let store = Arc::new(Mutex::new(CacheStore::new()));
        let token = CancellationToken::new();
        let (handle, mut state_rx) = spawn_test_sweeper(store.clone(), token.clone());

        assert_eq!(*state_rx.borrow(), SweeperState::Running);

        token.cancel();
        handle.await.unwrap();

        state_rx.changed().await.unwrap();
        assert_eq!(*state_rx.borrow(), SweeperState::Stopped);

        // No further sweeps after stopping
        store
            .lock()
            .await
            .add("after_stop", "value", Strategy::auto(Duration::from_millis(10)))
            .unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(store.lock().await.contains_key("after_stop"));
    }
}
