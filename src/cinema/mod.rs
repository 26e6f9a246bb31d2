//! Movie showtimes from the external cinema schedule feed.
//!
//! [`ScheduleService`] answers page requests from a TTL cache, falls back to a
//! stale entry or the bundled sample schedule when the feed is down, and
//! reports which of those the visitor is looking at. [`ScheduleRefresher`]
//! keeps configured cinemas warm in the background.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod cache;
pub mod feed;
pub mod refresher;
pub mod service;

pub use cache::{CacheEntry, ScheduleCache};
pub use feed::{CinemaFeed, HttpCinemaFeed};
pub use refresher::ScheduleRefresher;
pub use service::ScheduleService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Classification label, e.g. "PG-13"
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Start times as `HH:MM`, in screening order
    #[serde(default)]
    pub showtimes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceTier {
    pub label: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CinemaInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub pricing: Vec<PriceTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CinemaSchedule {
    pub cinema: CinemaInfo,
    #[serde(default)]
    pub movies: Vec<Movie>,
}

/// Where the schedule on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    /// Fetched from the feed while serving this request
    Live,
    /// Served from the cache
    Cached,
    /// Bundled sample data
    Fallback,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Live => "live",
            ScheduleStatus::Cached => "cached",
            ScheduleStatus::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScheduleSnapshot {
    pub schedule: CinemaSchedule,
    pub status: ScheduleStatus,
    /// When the feed produced this schedule; absent for sample data
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Movies whose title contains `query`, ignoring case. A blank query keeps everything.
pub fn search_movies<'a>(movies: &'a [Movie], query: &str) -> Vec<&'a Movie> {
    let needle = query.trim().to_lowercase();
    movies
        .iter()
        .filter(|movie| needle.is_empty() || movie.title.to_lowercase().contains(&needle))
        .collect()
}
