//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and
//! scheduled TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::adapter::{HealthDetails, HealthReport};
use crate::cache::expiry::{resolve_ttl, ExpirationScheduler};
use crate::cache::{CacheEntry, CacheStats, CacheValue, LruTracker, StatsSnapshot};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Set Entry ==
/// One write in a bulk `mset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub key: String,
    pub value: CacheValue,
    /// TTL in seconds; omitted means the store default
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetEntry {
    pub fn new(key: impl Into<String>, value: CacheValue, ttl: Option<i64>) -> Self {
        Self {
            key: key.into(),
            value,
            ttl,
        }
    }
}

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// The store is single-owner and synchronous. Every operation first fires
/// the expirations that are due, so a key whose deadline has passed is
/// never observed, counted, or evicted as if it were live.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Pending per-key expirations
    expirations: ExpirationScheduler,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of live entries
    max_entries: usize,
    /// Default TTL in seconds for writes without explicit TTL
    default_ttl: Option<u64>,
    /// Running sum of entry sizes
    memory_usage: usize,
    disconnected: bool,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of live entries (0 evicts every insert)
    /// * `default_ttl` - Fallback TTL in seconds for writes that omit one
    pub fn new(max_entries: usize, default_ttl: Option<u64>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expirations: ExpirationScheduler::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
            memory_usage: 0,
            disconnected: false,
        }
    }

    /// Builds a store from configuration, rejecting negative capacity or
    /// default TTL.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.max_entries as usize,
            config.default_ttl.map(|ttl| ttl as u64),
        ))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` when the key is absent or expired; both count as a
    /// miss. A hit promotes the key to most recently used.
    pub fn get(&mut self, key: &str) -> Result<Option<CacheValue>> {
        self.ensure_connected()?;
        let now = Instant::now();
        self.expire_due_at(now);
        Ok(self.lookup(key, now))
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Overwriting replaces the value and its expiration without counting as
    /// an eviction. A new key beyond capacity evicts the least recently
    /// used entry.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in seconds (uses default_ttl if None, 0 = none)
    pub fn set(&mut self, key: String, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        self.ensure_connected()?;
        let lifetime = resolve_ttl(ttl, self.default_ttl)?;
        let now = Instant::now();
        self.expire_due_at(now);
        self.insert(key, value, lifetime, now);
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        self.ensure_connected()?;
        self.expire_due_at(Instant::now());
        Ok(self.remove_entry(key).is_some())
    }

    // == Multi Get ==
    /// Looks up every key in order, with `get` semantics per position.
    ///
    /// Duplicate keys produce one result (and one hit or miss) each.
    pub fn mget(&mut self, keys: &[String]) -> Result<Vec<Option<CacheValue>>> {
        self.ensure_connected()?;
        let now = Instant::now();
        self.expire_due_at(now);
        Ok(keys.iter().map(|key| self.lookup(key, now)).collect())
    }

    // == Multi Set ==
    /// Applies `set` to every entry in order; later duplicates win.
    ///
    /// All TTLs are validated before anything is written, so a negative TTL
    /// anywhere in the batch leaves the store untouched.
    pub fn mset(&mut self, entries: Vec<SetEntry>) -> Result<()> {
        self.ensure_connected()?;
        let lifetimes = entries
            .iter()
            .map(|entry| resolve_ttl(entry.ttl, self.default_ttl))
            .collect::<Result<Vec<_>>>()?;

        let now = Instant::now();
        self.expire_due_at(now);
        for (entry, lifetime) in entries.into_iter().zip(lifetimes) {
            self.insert(entry.key, entry.value, lifetime, now);
        }
        Ok(())
    }

    // == Stats ==
    /// Returns a point-in-time statistics snapshot.
    ///
    /// Still answers after `disconnect`, reporting an empty store.
    pub fn stats(&mut self) -> StatsSnapshot {
        if !self.disconnected {
            self.expire_due_at(Instant::now());
        }
        self.stats.snapshot(self.entries.len(), self.memory_usage)
    }

    // == Health ==
    /// Reports health. The in-memory store has no external dependency, so it
    /// is healthy for as long as it has not been disconnected.
    pub fn health(&mut self) -> HealthReport {
        let snapshot = self.stats();
        let details = HealthDetails {
            entry_count: snapshot.entry_count,
            max_entries: self.max_entries,
            memory_usage: snapshot.memory_usage,
        };

        if self.disconnected {
            HealthReport::unhealthy("In-memory cache has been disconnected", details)
        } else {
            HealthReport::healthy("In-memory cache is operational", details)
        }
    }

    // == Disconnect ==
    /// Cancels every pending expiration and drops all entries.
    ///
    /// Idempotent. Later reads and writes fail with `Disconnected`.
    pub fn disconnect(&mut self) {
        if self.disconnected {
            return;
        }

        let dropped = self.entries.len();
        self.expirations.clear();
        self.entries.clear();
        self.lru.clear();
        self.memory_usage = 0;
        self.disconnected = true;

        info!(dropped_entries = dropped, "cache store disconnected");
    }

    // == Expire Due ==
    /// Fires every expiration whose deadline has passed.
    ///
    /// Returns the number of entries removed. Expired removals are neither
    /// evictions nor misses.
    pub fn expire_due(&mut self) -> usize {
        if self.disconnected {
            return 0;
        }
        self.expire_due_at(Instant::now())
    }

    /// Earliest pending expiration deadline.
    pub fn next_expiration(&self) -> Option<Instant> {
        self.expirations.next_deadline()
    }

    // == Length ==
    /// Returns the number of entries currently held, including any whose
    /// deadline passed since the last operation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn pending_expirations(&self) -> usize {
        self.expirations.len()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    // == Internals ==
    fn ensure_connected(&self) -> Result<()> {
        if self.disconnected {
            Err(CacheError::Disconnected)
        } else {
            Ok(())
        }
    }

    fn expire_due_at(&mut self, now: Instant) -> usize {
        if self.expirations.is_empty() {
            return 0;
        }
        let due = self.expirations.pop_due(now);
        let count = due.len();
        for key in due {
            self.remove_entry(&key);
            debug!(key = %key, "entry expired");
        }
        count
    }

    /// Single-key read shared by `get` and `mget`.
    fn lookup(&mut self, key: &str, now: Instant) -> Option<CacheValue> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            // Passive expiration: same outcome as the scheduled one.
            self.remove_entry(key);
            self.stats.record_miss();
            debug!(key = %key, "entry expired on read");
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn insert(&mut self, key: String, value: CacheValue, lifetime: Option<Duration>, now: Instant) {
        // A deadline past what the clock can represent never arrives.
        let expires_at = lifetime.and_then(|ttl| now.checked_add(ttl));
        self.expirations.cancel(&key);

        let entry = CacheEntry::new(&key, value, expires_at);
        self.memory_usage += entry.size;
        if let Some(previous) = self.entries.insert(key.clone(), entry) {
            self.memory_usage -= previous.size;
        }

        self.lru.touch(&key);
        if let Some(deadline) = expires_at {
            self.expirations.schedule(&key, deadline);
        }

        self.enforce_capacity();
    }

    /// Evicts least recently used entries until the store fits. With a
    /// capacity of 0 this removes the entry that was just inserted.
    fn enforce_capacity(&mut self) {
        while self.entries.len() > self.max_entries {
            let Some(victim) = self.lru.peek_oldest().map(str::to_string) else {
                break;
            };
            self.remove_entry(&victim);
            self.stats.record_eviction();
            debug!(key = %victim, "evicted least recently used entry");
        }
    }

    /// Removes a key from every structure that tracks it.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        self.expirations.cancel(key);
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.memory_usage -= entry.size;
        Some(entry)
    }

    /// Panics if the entry map, LRU order, expiration registry and memory
    /// accounting disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.lru.len(), "lru out of sync");
        assert!(self.entries.len() <= self.max_entries, "over capacity");

        let mut memory = 0;
        let mut timed = 0;
        for (key, entry) in &self.entries {
            assert!(self.lru.contains(key), "untracked key {}", key);
            assert_eq!(
                entry.expires_at,
                self.expirations.deadline(key),
                "deadline mismatch for {}",
                key
            );
            if entry.expires_at.is_some() {
                timed += 1;
            }
            memory += entry.size;
        }
        assert_eq!(timed, self.expirations.len(), "stray expirations");
        assert_eq!(memory, self.memory_usage, "memory accounting drift");
    }
}
