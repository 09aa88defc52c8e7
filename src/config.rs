//! Configuration Module
//!
//! Handles loading and validating engine and server configuration from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Longest accepted sweep interval, in seconds (one day).
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 86_400;

/// Engine and server configuration parameters.
///
/// Capacity and default TTL are kept signed so that a negative value coming
/// from the environment is reported by [`Config::validate`] instead of being
/// silently dropped by the parser.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of live entries (0 means every insert is evicted)
    pub max_entries: i64,
    /// Fallback TTL in seconds for writes that omit one
    pub default_ttl: Option<i64>,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiration sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum live entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: unset, no expiration)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expiration sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }

    // == Validate ==
    /// Rejects values the engine cannot be constructed with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries < 0 {
            return Err(CacheError::InvalidConfig(format!(
                "capacity must be non-negative, got {}",
                self.max_entries
            )));
        }
        if let Some(ttl) = self.default_ttl {
            if ttl < 0 {
                return Err(CacheError::InvalidConfig(format!(
                    "default TTL must be non-negative, got {}",
                    ttl
                )));
            }
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be at least one second".to_string(),
            ));
        }
        if self.sweep_interval > MAX_SWEEP_INTERVAL_SECS {
            return Err(CacheError::InvalidConfig(format!(
                "sweep interval must be at most {} seconds, got {}",
                MAX_SWEEP_INTERVAL_SECS, self.sweep_interval
            )));
        }
        Ok(())
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: None,
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}
