//! Expiration Scheduler Module
//!
//! Keeps at most one pending expiration per key, ordered by deadline, and
//! resolves TTL arguments into deadlines.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{CacheError, Result};

// == TTL Resolution ==
/// Turns a write's TTL argument into an effective lifetime.
///
/// - `None` falls back to `default_ttl`
/// - negative seconds are rejected, never clamped
/// - `0` means "no expiration", exactly like an unset TTL
pub fn resolve_ttl(ttl: Option<i64>, default_ttl: Option<u64>) -> Result<Option<Duration>> {
    let seconds = match ttl {
        Some(secs) if secs < 0 => return Err(CacheError::InvalidTtl(secs)),
        Some(secs) => secs as u64,
        None => match default_ttl {
            Some(secs) => secs,
            None => return Ok(None),
        },
    };

    if seconds == 0 {
        Ok(None)
    } else {
        Ok(Some(Duration::from_secs(seconds)))
    }
}

// == Expiration Scheduler ==
/// Deadline-ordered registry of pending expirations.
///
/// Each registration gets a sequence number so two keys sharing a deadline
/// still have distinct slots in the ordered map. Cancelling removes the
/// registration from both maps immediately, so a cancelled expiration can
/// never fire afterwards.
#[derive(Debug, Default)]
pub struct ExpirationScheduler {
    queue: BTreeMap<(Instant, u64), String>,
    pending: HashMap<String, (Instant, u64)>,
    next_seq: u64,
}

impl ExpirationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // == Schedule ==
    /// Arms a one-shot expiration for `key` at `deadline`, replacing any
    /// registration the key already had.
    pub fn schedule(&mut self, key: &str, deadline: Instant) {
        self.cancel(key);

        let slot = (deadline, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(slot, key.to_string());
        self.pending.insert(key.to_string(), slot);
    }

    // == Cancel ==
    /// Drops the pending expiration for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some(slot) => {
                self.queue.remove(&slot);
                true
            }
            None => false,
        }
    }

    // == Pop Due ==
    /// Removes and returns every key whose deadline is at or before `now`,
    /// earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<String> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let key = entry.remove();
            self.pending.remove(&key);
            due.push(key);
        }
        due
    }

    /// Deadline registered for `key`, if any.
    pub fn deadline(&self, key: &str) -> Option<Instant> {
        self.pending.get(key).map(|(deadline, _)| *deadline)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancels every pending expiration.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}
