//! Cinema schedule feed client.

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use url::Url;

use super::CinemaSchedule;
use crate::error::DataError;

/// Source of cinema schedules.
#[async_trait]
pub trait CinemaFeed: Send + Sync {
    async fn fetch_schedule(&self, cinema_id: &str) -> Result<CinemaSchedule, DataError>;
}

/// JSON feed served at `GET {base}/cinemas/{id}/schedule`.
#[derive(Debug, Clone)]
pub struct HttpCinemaFeed {
    client: Client,
    base_url: Url,
}

impl HttpCinemaFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DataError> {
        let base_url = Url::parse(base_url).map_err(|e| DataError::Decode {
            what: "cinema feed base url",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::Decode {
                what: "cinema feed base url",
                reason: format!("'{}' cannot be used as a base url", base_url),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn schedule_url(&self, cinema_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["cinemas", cinema_id, "schedule"]);
        }
        url
    }
}

#[async_trait]
impl CinemaFeed for HttpCinemaFeed {
    async fn fetch_schedule(&self, cinema_id: &str) -> Result<CinemaSchedule, DataError> {
        let url = self.schedule_url(cinema_id);
        tracing::debug!(%url, cinema_id, "Fetching cinema schedule");

        let result = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(DataError::FeedStatus {
                    status: status.as_u16(),
                });
            }
            response
                .json::<CinemaSchedule>()
                .await
                .map_err(|e| DataError::Decode {
                    what: "cinema schedule",
                    reason: e.to_string(),
                })
        }
        .await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        counter!("mall_cinema_feed_fetch_total", "outcome" => outcome).increment(1);
        result
    }
}
