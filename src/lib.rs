//! Mini Cache - An in-process cache engine
//!
//! Key/value storage with per-key TTL expiration, bounded capacity with LRU
//! eviction, statistics and health, exposed through the `CacheAdapter`
//! contract. A thin HTTP surface is included for running it as a server.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheAdapter, CacheStore, MemoryAdapter};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_expiration_sweeper;
