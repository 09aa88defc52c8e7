//! Integration Tests for the Cache Adapter Contract
//!
//! Drives the in-memory adapter only through `dyn CacheAdapter`, on a paused
//! tokio clock so TTL behavior is deterministic.

use std::sync::Arc;
use std::time::Duration;

use mini_cache::cache::SetEntry;
use mini_cache::{CacheAdapter, CacheError, CacheStore, Config, MemoryAdapter};
use serde_json::json;
use tokio::time::advance;
use tokio_test::{assert_err, assert_ok};

fn adapter(capacity: usize) -> Arc<dyn CacheAdapter> {
    Arc::new(MemoryAdapter::new(CacheStore::new(capacity, None)))
}

async fn secs(n: u64) {
    advance(Duration::from_secs(n)).await;
}

#[test]
fn test_negative_capacity_fails_at_construction() {
    let config = Config {
        max_entries: -1,
        ..Config::default()
    };
    assert!(matches!(
        MemoryAdapter::from_config(&config),
        Err(CacheError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn test_capacity_invariant_and_lru_order() {
    let cache = adapter(3);

    for i in 1u64..=7 {
        assert_ok!(cache.set(&format!("k{}", i), json!(i), None).await);
        let stats = cache.stats().await.unwrap();
        assert!(stats.entry_count <= 3);
        assert_eq!(stats.evictions, i.saturating_sub(3));
    }

    let keys: Vec<String> = (1..=7).map(|i| format!("k{}", i)).collect();
    let values = cache.mget(&keys).await.unwrap();
    assert_eq!(
        values,
        vec![None, None, None, None, Some(json!(5)), Some(json!(6)), Some(json!(7))]
    );
}

#[tokio::test]
async fn test_recency_effect() {
    let cache = adapter(3);

    cache.set("k1", json!(1), None).await.unwrap();
    cache.set("k2", json!(2), None).await.unwrap();
    cache.set("k3", json!(3), None).await.unwrap();
    cache.get("k1").await.unwrap();
    cache.set("k4", json!(4), None).await.unwrap();

    assert_eq!(cache.get("k2").await.unwrap(), None);
    assert_eq!(cache.get("k1").await.unwrap(), Some(json!(1)));
}

#[tokio::test(start_paused = true)]
async fn test_ttl_expiration_counts_miss() {
    let cache = adapter(10);

    cache.set("a", json!("v"), Some(60)).await.unwrap();
    secs(61).await;

    assert_eq!(cache.get("a").await.unwrap(), None);
    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.evictions, 0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_ttl_quirk() {
    let cache = adapter(10);

    cache.set("a", json!("v"), Some(0)).await.unwrap();
    secs(1_000_000).await;

    assert_eq!(cache.get("a").await.unwrap(), Some(json!("v")));
}

#[tokio::test]
async fn test_negative_ttl_fails_without_mutation() {
    let cache = adapter(10);

    let result = cache.set("a", json!("v"), Some(-1)).await;
    assert_eq!(assert_err!(result), CacheError::InvalidTtl(-1));
    assert_eq!(cache.stats().await.unwrap().entry_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_cancels_timer() {
    let cache = adapter(10);

    cache.set("a", json!("v1"), Some(60)).await.unwrap();
    cache.set("a", json!("v2"), Some(120)).await.unwrap();

    secs(61).await;
    assert_eq!(cache.get("a").await.unwrap(), Some(json!("v2")));

    secs(60).await;
    assert_eq!(cache.get("a").await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_delete_then_reinsert_is_not_hit_by_stale_timer() {
    let cache = adapter(10);

    cache.set("a", json!("old"), Some(10)).await.unwrap();
    assert!(cache.delete("a").await.unwrap());
    cache.set("a", json!("new"), None).await.unwrap();

    secs(30).await;
    assert_eq!(cache.get("a").await.unwrap(), Some(json!("new")));
}

#[tokio::test]
async fn test_mget_order_and_duplicates() {
    let cache = adapter(10);
    cache.set("k1", json!("v1"), None).await.unwrap();

    let keys = vec!["k1".to_string(), "missing".to_string(), "k1".to_string()];
    let values = cache.mget(&keys).await.unwrap();

    assert_eq!(values, vec![Some(json!("v1")), None, Some(json!("v1"))]);
    assert!(cache.mget(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mset_last_write_wins() {
    let cache = adapter(10);

    cache
        .mset(vec![
            SetEntry::new("k1", json!("v1"), None),
            SetEntry::new("k1", json!("v2"), None),
        ])
        .await
        .unwrap();

    assert_eq!(cache.get("k1").await.unwrap(), Some(json!("v2")));
    assert_ok!(cache.mset(Vec::new()).await);
}

#[tokio::test(start_paused = true)]
async fn test_stats_consistency() {
    let cache = adapter(2);

    cache.set("a", json!(1), Some(5)).await.unwrap();
    cache.set("b", json!(2), None).await.unwrap();
    cache.get("a").await.unwrap(); // hit
    cache.mget(&["a".to_string(), "zz".to_string()]).await.unwrap(); // hit, miss
    cache.delete("b").await.unwrap(); // not an eviction

    secs(6).await; // "a" expires, not an eviction

    cache.set("c", json!(3), None).await.unwrap();
    cache.set("d", json!(4), None).await.unwrap();
    cache.set("e", json!(5), None).await.unwrap(); // evicts "c"
    cache.get("a").await.unwrap(); // miss

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.entry_count, 2);
    assert_eq!(stats.uptime_ms, 6_000);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_clears_state_and_timers() {
    let memory = MemoryAdapter::new(CacheStore::new(10, None)).with_sweeper(Duration::from_secs(1));
    let store = memory.store();
    let cache: Arc<dyn CacheAdapter> = Arc::new(memory);

    cache.set("a", json!(1), Some(5)).await.unwrap();
    cache.set("b", json!(2), None).await.unwrap();

    cache.disconnect().await.unwrap();
    assert_eq!(store.lock().await.pending_expirations(), 0);

    secs(10).await;

    assert_eq!(cache.stats().await.unwrap().entry_count, 0);
    assert_eq!(cache.get("b").await, Err(CacheError::Disconnected));
    assert!(!cache.health_check().await.healthy);
    assert_ok!(cache.disconnect().await);
}
