//! Background schedule refresh.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::{ScheduleService, ScheduleStatus};
use crate::clock::Clock;

/// Refreshes configured cinemas on a fixed period until cancelled.
pub struct ScheduleRefresher<C: Clock> {
    service: Arc<ScheduleService<C>>,
    cinema_ids: Vec<String>,
    period: Duration,
}

impl<C: Clock + 'static> ScheduleRefresher<C> {
    pub fn new(service: Arc<ScheduleService<C>>, cinema_ids: Vec<String>, period: Duration) -> Self {
        Self {
            service,
            cinema_ids,
            period,
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run the refresh loop until the provided shutdown token fires. The
    /// first refresh happens immediately.
    #[instrument(skip_all, fields(cinemas = self.cinema_ids.len()))]
    pub async fn run(self, shutdown: CancellationToken) {
        if !self.service.has_feed() {
            info!("No cinema feed configured, schedule refresher idle");
            return;
        }

        info!(period_secs = self.period.as_secs(), "Starting schedule refresher");
        let mut ticker = interval_at(Instant::now(), self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Schedule refresher shutdown requested");
                    break;
                }
                _ = ticker.tick() => self.tick().await,
            }
        }

        info!("Schedule refresher stopped");
    }

    async fn tick(&self) {
        for cinema_id in &self.cinema_ids {
            let snapshot = self.service.refresh(cinema_id).await;
            counter!("mall_cinema_refresh_total", "status" => snapshot.status.as_str()).increment(1);
            if snapshot.status != ScheduleStatus::Live {
                debug!(
                    cinema_id = %cinema_id,
                    status = snapshot.status.as_str(),
                    "Refresh did not reach the feed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cinema::{CinemaFeed, HttpCinemaFeed};
    use crate::clock::SystemClock;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn refreshes_until_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cinemas/main/schedule"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cinema": {"id": "main", "name": "Feed Cinema"},
                "movies": []
            })))
            .mount(&server)
            .await;

        let feed = HttpCinemaFeed::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let service = Arc::new(ScheduleService::new(
            Some(Arc::new(feed) as Arc<dyn CinemaFeed>),
            SystemClock,
            chrono::Duration::minutes(10),
        ));
        let shutdown = CancellationToken::new();
        let handle = ScheduleRefresher::new(
            service.clone(),
            vec!["main".to_string()],
            Duration::from_millis(20),
        )
        .spawn(shutdown.clone());

        tokio::time::sleep(Duration::from_millis(120)).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("refresher should stop")
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests.len() >= 2);

        let snapshot = service.schedule("main").await;
        assert_eq!(snapshot.status, ScheduleStatus::Cached);
        assert_eq!(snapshot.schedule.cinema.name, "Feed Cinema");
    }

    #[tokio::test]
    async fn returns_immediately_without_feed() {
        let service = Arc::new(ScheduleService::new(
            None,
            SystemClock,
            chrono::Duration::minutes(10),
        ));
        let handle = ScheduleRefresher::new(service, vec!["main".to_string()], Duration::from_secs(60))
            .spawn(CancellationToken::new());

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("idle refresher exits")
            .unwrap();
    }
}
