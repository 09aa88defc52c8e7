//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - Expiration sweeper: fires due TTL expirations while the cache is idle

mod sweeper;

pub use sweeper::spawn_expiration_sweeper;
