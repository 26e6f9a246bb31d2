//! Bounded schedule cache with a fixed staleness window.

use std::num::NonZeroUsize;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use tokio::sync::RwLock;

use super::CinemaSchedule;
use crate::clock::Clock;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub schedule: CinemaSchedule,
    pub fetched_at: DateTime<Utc>,
}

/// Schedules keyed by cinema id.
pub struct ScheduleCache<C: Clock> {
    entries: RwLock<LruCache<String, CacheEntry>>,
    ttl: Duration,
    clock: C,
}

impl<C: Clock> ScheduleCache<C> {
    pub fn new(clock: C, capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Entry younger than the staleness window.
    pub async fn fresh(&self, cinema_id: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries
            .get(cinema_id)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .cloned()
    }

    /// Entry of any age.
    pub async fn latest(&self, cinema_id: &str) -> Option<CacheEntry> {
        let mut entries = self.entries.write().await;
        entries.get(cinema_id).cloned()
    }

    /// Stores a fetch result unless a newer one is already cached. Returns
    /// whether the entry was written.
    pub async fn store(
        &self,
        cinema_id: &str,
        schedule: CinemaSchedule,
        fetched_at: DateTime<Utc>,
    ) -> bool {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.peek(cinema_id)
            && existing.fetched_at > fetched_at
        {
            tracing::debug!(
                cinema_id,
                existing = %existing.fetched_at,
                incoming = %fetched_at,
                "Ignoring schedule older than the cached one"
            );
            return false;
        }
        entries.put(
            cinema_id.to_string(),
            CacheEntry {
                schedule,
                fetched_at,
            },
        );
        true
    }
}
