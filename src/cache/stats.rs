//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;
use tokio::time::Instant;

// == Cache Stats ==
/// Monotonic counters owned by one store for its whole life.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups on absent or expired keys
    pub misses: u64,
    /// Capacity-triggered removals only
    pub evictions: u64,
    /// When the owning store was constructed
    pub started_at: Instant,
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            evictions: 0,
            started_at: Instant::now(),
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
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

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Snapshot ==
    /// Combines the counters with gauges read from the store.
    pub fn snapshot(&self, entry_count: usize, memory_usage: usize) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entry_count,
            memory_usage,
            uptime_ms: self.started_at.elapsed().as_millis() as u64,
            hit_rate: self.hit_rate(),
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view returned by `stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Live entries only
    pub entry_count: usize,
    /// Approximate bytes held by keys and values
    pub memory_usage: usize,
    /// Milliseconds since the store was constructed
    pub uptime_ms: u64,
    pub hit_rate: f64,
}
