//! Expiration Sweeper Task
//!
//! Background task that fires due TTL expirations while no caller is
//! touching the cache. Reads stay correct without it; the sweeper only keeps
//! expired entries from lingering in memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::MAX_SWEEP_INTERVAL_SECS;

/// Spawns a background task that fires due expirations.
///
/// The task wakes at the earlier of the next pending deadline and
/// `interval` from now, takes the store lock, and removes every expired
/// entry. It exits on its own once the store is disconnected. Intervals
/// longer than a day are clamped to a day.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `interval` - Longest time the task sleeps between passes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it during
/// shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(1000, None)));
/// let sweeper = spawn_expiration_sweeper(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_expiration_sweeper(
    store: Arc<Mutex<CacheStore>>,
    interval: Duration,
) -> JoinHandle<()> {
    let interval = interval.min(Duration::from_secs(MAX_SWEEP_INTERVAL_SECS));
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting expiration sweeper");

        loop {
            let wake_at = {
                let guard = store.lock().await;
                let fallback = Instant::now() + interval;
                match guard.next_expiration() {
                    Some(deadline) if deadline < fallback => deadline,
                    _ => fallback,
                }
            };

            sleep_until(wake_at).await;

            let removed = {
                let mut guard = store.lock().await;
                if guard.is_disconnected() {
                    break;
                }
                guard.expire_due()
            };

            if removed > 0 {
                info!("expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("expiration sweep: nothing due");
            }
        }

        info!("expiration sweeper exiting, store disconnected");
    })
}
