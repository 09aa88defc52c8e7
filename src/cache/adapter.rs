//! Cache Adapter Module
//!
//! The storage contract callers depend on, and its in-memory implementation.
//!
//! Other backends (for example a network-attached store) implement the same
//! trait. Such a backend may suspend inside any operation and reports
//! `healthy = false` with a descriptive message when it cannot reach its
//! server; its hit/miss/eviction counters describe completed I/O only.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStore, CacheValue, SetEntry, StatsSnapshot};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::spawn_expiration_sweeper;

// == Health Report ==
/// Gauges attached to a health report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthDetails {
    pub entry_count: usize,
    pub max_entries: usize,
    pub memory_usage: usize,
}

/// Result of `health_check`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub message: String,
    pub details: HealthDetails,
    /// RFC 3339 timestamp of the check
    pub checked_at: String,
}

impl HealthReport {
    pub fn healthy(message: impl Into<String>, details: HealthDetails) -> Self {
        Self::build(true, message.into(), details)
    }

    pub fn unhealthy(message: impl Into<String>, details: HealthDetails) -> Self {
        Self::build(false, message.into(), details)
    }

    fn build(healthy: bool, message: String, details: HealthDetails) -> Self {
        Self {
            healthy,
            message,
            details,
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Cache Adapter Trait ==
/// Cache storage contract.
///
/// Implement this trait to provide a cache backend. Callers hold an
/// `Arc<dyn CacheAdapter>` and never see the concrete variant.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Get a live value, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<CacheValue>>;

    /// Store a value; `ttl` in seconds, `None` = default, `Some(0)` = never
    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Get several keys, one result per input position
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<CacheValue>>>;

    /// Set several entries in order, last duplicate wins
    async fn mset(&self, entries: Vec<SetEntry>) -> Result<()>;

    async fn stats(&self) -> Result<StatsSnapshot>;

    async fn health_check(&self) -> HealthReport;

    /// Tear down; idempotent
    async fn disconnect(&self) -> Result<()>;
}

// Implement CacheAdapter for Arc<A> so shared handles can be passed directly
#[async_trait]
impl<A: CacheAdapter + ?Sized> CacheAdapter for Arc<A> {
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key).await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<CacheValue>>> {
        (**self).mget(keys).await
    }

    async fn mset(&self, entries: Vec<SetEntry>) -> Result<()> {
        (**self).mset(entries).await
    }

    async fn stats(&self) -> Result<StatsSnapshot> {
        (**self).stats().await
    }

    async fn health_check(&self) -> HealthReport {
        (**self).health_check().await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}

// == Memory Adapter ==
/// In-memory cache adapter.
///
/// All state sits behind one mutex, so each operation (including the
/// expirations it fires first) is a single atomic step. The optional sweeper
/// task fires expirations while the cache is idle.
pub struct MemoryAdapter {
    store: Arc<Mutex<CacheStore>>,
    sweeper: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl MemoryAdapter {
    /// Wraps an existing store without a background sweeper.
    pub fn new(store: CacheStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            sweeper: std::sync::Mutex::new(None),
        }
    }

    /// Validates the configuration and builds an adapter around a new store.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(CacheStore::from_config(config)?))
    }

    /// Starts the background expiration sweeper. Must be called from within
    /// a tokio runtime. A previously started sweeper is replaced.
    pub fn with_sweeper(self, interval: Duration) -> Self {
        let handle = spawn_expiration_sweeper(self.store.clone(), interval);
        if let Some(previous) = self.replace_sweeper(Some(handle)) {
            previous.abort();
        }
        self
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<CacheStore>> {
        self.store.clone()
    }

    fn replace_sweeper(&self, handle: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        match self.sweeper.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, handle),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), handle),
        }
    }
}

impl Drop for MemoryAdapter {
    fn drop(&mut self) {
        if let Some(handle) = self.replace_sweeper(None) {
            handle.abort();
        }
    }
}

#[async_trait]
impl CacheAdapter for MemoryAdapter {
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.store.lock().await.get(key)
    }

    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        self.store.lock().await.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.store.lock().await.delete(key)
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<CacheValue>>> {
        self.store.lock().await.mget(keys)
    }

    async fn mset(&self, entries: Vec<SetEntry>) -> Result<()> {
        self.store.lock().await.mset(entries)
    }

    async fn stats(&self) -> Result<StatsSnapshot> {
        Ok(self.store.lock().await.stats())
    }

    async fn health_check(&self) -> HealthReport {
        self.store.lock().await.health()
    }

    async fn disconnect(&self) -> Result<()> {
        if let Some(handle) = self.replace_sweeper(None) {
            handle.abort();
            info!("expiration sweeper stopped");
        }
        self.store.lock().await.disconnect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter(capacity: usize) -> Arc<dyn CacheAdapter> {
        Arc::new(MemoryAdapter::new(CacheStore::new(capacity, None)))
    }

    #[tokio::test]
    async fn test_adapter_roundtrip_through_trait_object() {
        let cache = adapter(10);

        cache.set("k", json!({"n": 1}), None).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(json!({"n": 1})));
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check_is_healthy() {
        let cache = adapter(10);

        let report = cache.health_check().await;
        assert!(report.healthy);
        assert_eq!(report.details.max_entries, 10);
        assert!(!report.checked_at.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let cache = adapter(10);
        cache.set("k", json!(1), Some(30)).await.unwrap();

        cache.disconnect().await.unwrap();
        cache.disconnect().await.unwrap();

        assert_eq!(cache.stats().await.unwrap().entry_count, 0);
        assert!(cache.get("k").await.is_err());
    }

    #[tokio::test]
    async fn test_disconnect_stops_sweeper() {
        let adapter = MemoryAdapter::new(CacheStore::new(10, None))
            .with_sweeper(Duration::from_millis(10));
        assert!(adapter.sweeper.lock().unwrap().is_some());

        adapter.disconnect().await.unwrap();

        assert!(adapter.sweeper.lock().unwrap().is_none());
        assert!(adapter.store().lock().await.is_disconnected());
    }

    #[test]
    fn test_health_report_serializes() {
        let details = HealthDetails {
            entry_count: 2,
            max_entries: 5,
            memory_usage: 64,
        };
        let report = HealthReport::unhealthy("connection refused", details);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["healthy"], false);
        assert_eq!(json["message"], "connection refused");
        assert_eq!(json["details"]["max_entries"], 5);
    }
}
