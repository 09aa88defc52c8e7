//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies. Stats and health
//! bodies are the engine's own `StatsSnapshot` and `HealthReport`.

use serde::Serialize;

use crate::cache::CacheValue;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: CacheValue,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: CacheValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
    /// Whether the key existed before the delete
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        let key = key.into();
        let message = if deleted {
            format!("Key '{}' deleted successfully", key)
        } else {
            format!("Key '{}' was not present", key)
        };
        Self {
            message,
            key,
            deleted,
        }
    }
}

/// One position of an MGET result.
///
/// `found` disambiguates a missing key from a stored JSON `null`.
#[derive(Debug, Clone, Serialize)]
pub struct MgetItem {
    pub key: String,
    pub found: bool,
    pub value: Option<CacheValue>,
}

/// Response body for the MGET operation (POST /mget)
#[derive(Debug, Clone, Serialize)]
pub struct MgetResponse {
    pub results: Vec<MgetItem>,
}

impl MgetResponse {
    /// Pairs keys with lookup results position by position.
    pub fn new(keys: Vec<String>, values: Vec<Option<CacheValue>>) -> Self {
        let results = keys
            .into_iter()
            .zip(values)
            .map(|(key, value)| MgetItem {
                key,
                found: value.is_some(),
                value,
            })
            .collect();
        Self { results }
    }
}

/// Response body for the MSET operation (PUT /mset)
#[derive(Debug, Clone, Serialize)]
pub struct MsetResponse {
    pub message: String,
    /// Number of writes applied, duplicates included
    pub count: usize,
}

impl MsetResponse {
    pub fn new(count: usize) -> Self {
        Self {
            message: format!("{} entries set successfully", count),
            count,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
