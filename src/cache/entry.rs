//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::mem;

use tokio::time::Instant;

use crate::cache::CacheValue;

/// Fixed bookkeeping cost charged per entry in the memory estimate.
pub const ENTRY_OVERHEAD: usize = mem::size_of::<CacheEntry>();

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Recency is not stored here; the LRU tracker owns it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Absolute expiration deadline, None = no expiration
    pub expires_at: Option<Instant>,
    /// Approximate footprint of key + value + bookkeeping, in bytes
    pub size: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry for `key`.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under (only used for sizing)
    /// * `value` - The value to store
    /// * `expires_at` - Optional absolute deadline
    pub fn new(key: &str, value: CacheValue, expires_at: Option<Instant>) -> Self {
        let size = estimate_size(key, &value);
        Self {
            value,
            expires_at,
            size,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// An entry is expired once `now >= expires_at`, so the entry is gone the
    /// instant its TTL has fully elapsed. Entries without a deadline never
    /// expire.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Approximates the bytes held by one entry.
///
/// Values are measured by their compact JSON encoding. Always strictly
/// positive because of the per-entry overhead.
pub fn estimate_size(key: &str, value: &CacheValue) -> usize {
    key.len() + value.to_string().len() + ENTRY_OVERHEAD
}
