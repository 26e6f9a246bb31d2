//! # Server Configuration
//!
//! Application state, the router and the serve loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::http::Method;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cinema::{CinemaFeed, HttpCinemaFeed, ScheduleRefresher, ScheduleService};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::contact::ContactService;
use crate::data::SiteData;
use crate::error::DataError;
use crate::handlers::{api, pages};
use crate::seo::TrustPolicy;
use crate::telemetry;

/// Clock shared by every stateful component of one app instance.
pub type SharedClock = Arc<dyn Clock>;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub data: SiteData,
    pub cinema: Arc<ScheduleService<SharedClock>>,
    pub contact: Arc<ContactService<SharedClock>>,
    pub seo_policy: Arc<TrustPolicy>,
    pub clock: SharedClock,
}

impl AppState {
    /// `db` of `None` serves bundled content only.
    pub fn new(
        config: AppConfig,
        db: Option<DatabaseConnection>,
        clock: SharedClock,
    ) -> Result<Self, DataError> {
        let data = SiteData::new(db);

        let feed = match config.cinema.feed_base_url.as_deref() {
            Some(base_url) => {
                let feed = HttpCinemaFeed::new(
                    base_url,
                    StdDuration::from_secs(config.cinema.request_timeout_seconds),
                )?;
                Some(Arc::new(feed) as Arc<dyn CinemaFeed>)
            }
            None => None,
        };
        let cinema = ScheduleService::new(
            feed,
            clock.clone(),
            chrono::Duration::seconds(config.cinema.cache_ttl_seconds as i64),
        );
        let contact = ContactService::new(
            data.clone(),
            clock.clone(),
            chrono::Duration::seconds(config.contact.cooldown_seconds as i64),
        );

        Ok(Self {
            seo_policy: Arc::new(TrustPolicy::from_config(&config.seo)),
            config: Arc::new(config),
            data,
            cinema: Arc::new(cinema),
            contact: Arc::new(contact),
            clock,
        })
    }

    pub fn refresher(&self) -> ScheduleRefresher<SharedClock> {
        ScheduleRefresher::new(
            self.cinema.clone(),
            self.config.cinema.cinema_ids.clone(),
            StdDuration::from_secs(self.config.cinema.refresh_interval_seconds),
        )
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(api::list_tenants))
        .route("/categories", get(api::list_categories))
        .route("/posts", get(api::list_posts))
        .route("/posts/{slug}", get(api::get_post))
        .route("/movies", get(api::get_movies))
        .route("/promotions", get(api::list_promotions))
        .route("/contact", post(api::submit_contact))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/directory", get(pages::directory))
        .route("/blog", get(pages::blog_index))
        .route("/blog/{slug}", get(pages::blog_post))
        .route("/blog/{slug}/calendar.ics", get(pages::blog_calendar))
        .route("/movies", get(pages::movies))
        .route("/promotions", get(pages::promotions))
        .route("/contact", get(pages::contact_form).post(pages::contact_submit))
        .route("/healthz", get(api::health))
        .nest("/api", api_routes())
        .fallback(pages::not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(telemetry::propagate_trace_id))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

/// Starts the server and blocks until ctrl-c.
pub async fn run_server(config: AppConfig, db: Option<DatabaseConnection>) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState::new(config, db, Arc::new(SystemClock))?;
    if !state.data.is_connected() {
        warn!("Running without a database; all content comes from bundled data");
    }

    let shutdown = CancellationToken::new();
    let refresher = state.refresher().spawn(shutdown.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %profile, "Server listening");

    let signal = shutdown.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        signal.cancel();
    })
    .await?;

    shutdown.cancel();
    if let Err(err) = refresher.await {
        warn!(error = %err, "Schedule refresher ended abnormally");
    }
    info!("Server stopped");
    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::api::health,
        crate::handlers::api::list_tenants,
        crate::handlers::api::list_categories,
        crate::handlers::api::list_posts,
        crate::handlers::api::get_post,
        crate::handlers::api::get_movies,
        crate::handlers::api::list_promotions,
        crate::handlers::api::submit_contact,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::tenant::Model,
            crate::models::tenant_category::Model,
            crate::models::post::Model,
            crate::models::promotion::Model,
            crate::data::DataOrigin,
            crate::cinema::ScheduleSnapshot,
            crate::cinema::ScheduleStatus,
            crate::promotions::VisiblePromotion,
            crate::contact::ContactForm,
            crate::handlers::api::HealthStatus,
            crate::handlers::api::TenantListResponse,
            crate::handlers::api::CategoryListResponse,
            crate::handlers::api::PostListResponse,
            crate::handlers::api::PostResponse,
            crate::handlers::api::PromotionListResponse,
            crate::handlers::api::ContactReceipt,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "directory", description = "Tenant directory"),
        (name = "blog", description = "News and events"),
        (name = "movies", description = "Cinema showtimes"),
        (name = "promotions", description = "Current promotions"),
        (name = "contact", description = "Contact enquiries"),
    ),
    info(
        title = "Mall Site API",
        description = "Public content API for the mall website",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
