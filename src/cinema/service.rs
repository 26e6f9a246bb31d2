//! Schedule lookup with cache, feed and bundled fallback.

use std::sync::Arc;

use chrono::Duration;
use metrics::counter;
use tracing::warn;

use super::{CinemaFeed, ScheduleCache, ScheduleSnapshot, ScheduleStatus};
use crate::clock::Clock;
use crate::error::DataError;
use crate::seeds;

/// Cinemas tracked at most; the mall runs a handful.
const CACHE_CAPACITY: usize = 32;

pub struct ScheduleService<C: Clock> {
    feed: Option<Arc<dyn CinemaFeed>>,
    cache: ScheduleCache<C>,
}

impl<C: Clock> ScheduleService<C> {
    /// Without a feed every lookup serves the bundled sample schedule.
    pub fn new(feed: Option<Arc<dyn CinemaFeed>>, clock: C, ttl: Duration) -> Self {
        Self {
            feed,
            cache: ScheduleCache::new(clock, CACHE_CAPACITY, ttl),
        }
    }

    pub fn has_feed(&self) -> bool {
        self.feed.is_some()
    }

    /// Fresh cache entry if there is one, otherwise a feed fetch.
    pub async fn schedule(&self, cinema_id: &str) -> ScheduleSnapshot {
        if let Some(entry) = self.cache.fresh(cinema_id).await {
            return ScheduleSnapshot {
                schedule: entry.schedule,
                status: ScheduleStatus::Cached,
                fetched_at: Some(entry.fetched_at),
            };
        }
        self.refresh(cinema_id).await
    }

    /// Fetches from the feed regardless of cache age.
    pub async fn refresh(&self, cinema_id: &str) -> ScheduleSnapshot {
        let Some(feed) = &self.feed else {
            return self.fallback(cinema_id).await;
        };

        // Stamp before the request so a slow fetch cannot overwrite a later one.
        let started_at = self.cache.now();
        match feed.fetch_schedule(cinema_id).await {
            Ok(schedule) => {
                if self
                    .cache
                    .store(cinema_id, schedule.clone(), started_at)
                    .await
                {
                    ScheduleSnapshot {
                        schedule,
                        status: ScheduleStatus::Live,
                        fetched_at: Some(started_at),
                    }
                } else {
                    self.cached_or_fallback(cinema_id).await
                }
            }
            Err(err) => {
                self.record_feed_failure(cinema_id, &err);
                self.cached_or_fallback(cinema_id).await
            }
        }
    }

    async fn cached_or_fallback(&self, cinema_id: &str) -> ScheduleSnapshot {
        match self.cache.latest(cinema_id).await {
            Some(entry) => ScheduleSnapshot {
                schedule: entry.schedule,
                status: ScheduleStatus::Cached,
                fetched_at: Some(entry.fetched_at),
            },
            None => self.fallback(cinema_id).await,
        }
    }

    async fn fallback(&self, cinema_id: &str) -> ScheduleSnapshot {
        counter!("mall_data_fallback_total", "resource" => "cinema_schedule").increment(1);
        ScheduleSnapshot {
            schedule: seeds::sample_schedule(cinema_id),
            status: ScheduleStatus::Fallback,
            fetched_at: None,
        }
    }

    fn record_feed_failure(&self, cinema_id: &str, err: &DataError) {
        warn!(
            cinema_id,
            error = %err,
            "Cinema feed unavailable, serving cached or sample schedule"
        );
    }
}
