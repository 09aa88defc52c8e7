//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction behind a
//! pluggable adapter contract.

pub mod adapter;
mod entry;
pub mod expiry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use adapter::{CacheAdapter, HealthDetails, HealthReport, MemoryAdapter};
pub use entry::CacheEntry;
pub use expiry::ExpirationScheduler;
pub use lru::LruTracker;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{CacheStore, SetEntry};

/// Payload type stored by the cache. Opaque to the engine.
pub type CacheValue = serde_json::Value;
