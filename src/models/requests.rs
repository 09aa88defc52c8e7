//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{CacheValue, SetEntry};

/// Maximum accepted key length in bytes at the HTTP boundary.
pub const MAX_KEY_LENGTH: usize = 256;

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (default TTL if omitted, 0 = no expiration)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: CacheValue,
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid. TTL sign
    /// is checked by the engine.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for the MGET operation (POST /mget)
#[derive(Debug, Clone, Deserialize)]
pub struct MgetRequest {
    pub keys: Vec<String>,
}

/// Request body for the MSET operation (PUT /mset)
#[derive(Debug, Clone, Deserialize)]
pub struct MsetRequest {
    pub entries: Vec<SetEntry>,
}

impl MsetRequest {
    /// Validates every key in the batch.
    pub fn validate(&self) -> Option<String> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(i, entry)| validate_key(&entry.key).map(|msg| format!("entries[{}]: {}", i, msg)))
    }
}
