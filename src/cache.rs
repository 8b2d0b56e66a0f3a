//! Process-local memo of the last batch.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::models::ProductRecord;

/// Source of monotonic time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct Entry {
    records: Vec<ProductRecord>,
    stored_at: Instant,
}

/// Holds at most one result set, valid for `ttl` after it was stored.
pub struct ResultCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<Entry>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The stored records and their age, or `None` when nothing is stored
    /// or the entry is at least `ttl` old.
    pub async fn get(&self) -> Option<(Vec<ProductRecord>, Duration)> {
        let entry = self.entry.read().await;
        let entry = entry.as_ref()?;

        let age = self.clock.now().saturating_duration_since(entry.stored_at);
        if age >= self.ttl {
            tracing::debug!("Cached batch expired ({}s old)", age.as_secs());
            return None;
        }

        Some((entry.records.clone(), age))
    }

    /// Replaces any stored entry.
    pub async fn put(&self, records: Vec<ProductRecord>) {
        let mut entry = self.entry.write().await;
        *entry = Some(Entry {
            records,
            stored_at: self.clock.now(),
        });
    }

    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }
}
