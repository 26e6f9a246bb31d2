//! # JSON API Handlers
//!
//! Read endpoints mirror the HTML pages, including the offline fallback; the
//! `source` field says which store answered.

use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::blog::{self, BlogFilter, sanitize_html};
use crate::cinema::{ScheduleSnapshot, search_movies};
use crate::clock::Clock;
use crate::contact::{ClientKey, ContactForm, SubmitOutcome};
use crate::data::DataOrigin;
use crate::db;
use crate::directory::TenantQuery;
use crate::error::{ApiError, rate_limited, submission_failed, validation_error};
use crate::handlers::pages::cinema_id;
use crate::models::{ServiceInfo, post, tenant, tenant_category};
use crate::promotions::{VisiblePromotion, visible_promotions};
use crate::server::AppState;

const MAX_PAGE_SIZE: u64 = 100;

/// Service information plus database reachability
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[serde(flatten)]
    pub service: ServiceInfo,
    /// `connected`, `unreachable` or `offline` (no database configured)
    pub database: String,
}

/// Health check with service information
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is up; content may be served from bundled data", body = HealthStatus)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = match state.data.connection() {
        Some(conn) => match db::health_check(conn).await {
            Ok(()) => "connected",
            Err(_) => "unreachable",
        },
        None => "offline",
    };
    Json(HealthStatus {
        service: ServiceInfo::default(),
        database: database.to_string(),
    })
}

/// Query parameters for the tenant listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TenantListParams {
    /// Case-insensitive search across name, brand and description
    pub q: Option<String>,
    pub category_id: Option<i32>,
    /// Floor label, matched case-insensitively
    pub floor: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<u64>,
    /// Page size (default: configured directory page size, max: 100)
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TenantListResponse {
    pub data: Vec<tenant::Model>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub has_more: bool,
    pub source: DataOrigin,
}

/// List directory tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    params(TenantListParams),
    responses(
        (status = 200, description = "One page of tenants", body = TenantListResponse),
        (status = 400, description = "Invalid paging parameters", body = ApiError)
    ),
    tag = "directory"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    Query(params): Query<TenantListParams>,
) -> Result<Json<TenantListResponse>, ApiError> {
    let page_size = params
        .page_size
        .unwrap_or(state.config.directory.page_size);
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_PAGE_SIZE",
            format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
        ));
    }
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_PAGE",
            "page starts at 1",
        ));
    }
    let max_page = TenantQuery::max_page(page_size);
    if page > max_page {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_PAGE",
            format!("page must be at most {max_page} for page_size {page_size}"),
        ));
    }

    let mut query = TenantQuery::new(page_size);
    query.search = params.q.unwrap_or_default();
    query.category_id = params.category_id;
    query.floor = params.floor;
    query.page = page;

    let result = state.data.tenants(&query).await;
    let has_more = result.data.has_more();
    Ok(Json(TenantListResponse {
        data: result.data.items,
        total: result.data.total,
        page: result.data.page,
        page_size: result.data.page_size,
        has_more,
        source: result.origin,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub data: Vec<tenant_category::Model>,
    pub source: DataOrigin,
}

/// List tenant categories in display order
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Tenant categories", body = CategoryListResponse)
    ),
    tag = "directory"
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoryListResponse> {
    let result = state.data.tenant_categories().await;
    Json(CategoryListResponse {
        data: result.data,
        source: result.origin,
    })
}

/// Blog listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PostListParams {
    /// Category slug
    pub category: Option<String>,
    /// Tag, matched case-insensitively
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub data: Vec<post::Model>,
    pub source: DataOrigin,
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    params(PostListParams),
    responses(
        (status = 200, description = "Posts", body = PostListResponse)
    ),
    tag = "blog"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> Json<PostListResponse> {
    let filter = BlogFilter {
        category: params.category,
        tag: params.tag,
    };
    let posts = state.data.posts().await;
    let categories = state.data.post_categories().await;
    let source = if posts.is_fallback() || categories.is_fallback() {
        DataOrigin::Fallback
    } else {
        DataOrigin::Remote
    };

    Json(PostListResponse {
        data: filter
            .apply(posts.data, &categories.data)
            .into_iter()
            .map(with_sanitized_body)
            .collect(),
        source,
    })
}

fn with_sanitized_body(mut post: post::Model) -> post::Model {
    post.body = sanitize_html(&post.body);
    post
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    /// The post with its body sanitized
    pub data: post::Model,
    /// Related posts, also sanitized
    pub related: Vec<post::Model>,
    pub source: DataOrigin,
}

/// Fetch one post by slug
#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "No post with this slug", body = ApiError)
    ),
    tag = "blog"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let detail = blog::post_detail(&state.data, &slug).await?;

    Ok(Json(PostResponse {
        data: with_sanitized_body(detail.post),
        related: detail
            .related
            .into_iter()
            .map(with_sanitized_body)
            .collect(),
        source: detail.origin,
    }))
}

/// Movie listing parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MoviesQuery {
    /// Configured cinema id (default: the first configured)
    pub cinema: Option<String>,
    /// Case-insensitive title filter
    pub q: Option<String>,
}

/// Showtimes for one cinema
#[utoipa::path(
    get,
    path = "/api/movies",
    params(MoviesQuery),
    responses(
        (status = 200, description = "Schedule with its data source", body = ScheduleSnapshot)
    ),
    tag = "movies"
)]
pub async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> Json<ScheduleSnapshot> {
    let cinema_id = cinema_id(&state, params.cinema.as_deref()).to_string();
    let mut snapshot = state.cinema.schedule(&cinema_id).await;
    if let Some(q) = params.q.as_deref() {
        let matching = search_movies(&snapshot.schedule.movies, q)
            .into_iter()
            .cloned()
            .collect();
        snapshot.schedule.movies = matching;
    }
    Json(snapshot)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromotionListResponse {
    pub data: Vec<VisiblePromotion>,
    pub source: DataOrigin,
}

/// Published, unexpired promotions
#[utoipa::path(
    get,
    path = "/api/promotions",
    responses(
        (status = 200, description = "Visible promotions ordered by start date", body = PromotionListResponse)
    ),
    tag = "promotions"
)]
pub async fn list_promotions(State(state): State<AppState>) -> Json<PromotionListResponse> {
    let promotions = state.data.promotions().await;
    let today = state.clock.now().date_naive();
    Json(PromotionListResponse {
        data: visible_promotions(&promotions.data, today),
        source: promotions.origin,
    })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactReceipt {
    pub status: String,
    /// Reference of the stored enquiry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Uuid>,
}

/// Submit a contact enquiry
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactForm,
    responses(
        (status = 201, description = "Enquiry received", body = ContactReceipt),
        (status = 400, description = "Malformed JSON body", body = ApiError),
        (status = 422, description = "Field validation failed", body = ApiError),
        (status = 429, description = "Submitted too recently; see Retry-After", body = ApiError),
        (status = 502, description = "The enquiry could not be stored", body = ApiError)
    ),
    tag = "contact"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    client: ClientKey,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactReceipt>), ApiError> {
    let Json(form) = payload?;

    match state.contact.submit(&client, form).await {
        SubmitOutcome::Accepted(contact) => Ok((
            StatusCode::CREATED,
            Json(ContactReceipt {
                status: "received".to_string(),
                reference: Some(contact.id),
            }),
        )),
        SubmitOutcome::Rejected => Ok((
            StatusCode::CREATED,
            Json(ContactReceipt {
                status: "received".to_string(),
                reference: None,
            }),
        )),
        SubmitOutcome::Wait { remaining_seconds } => Err(rate_limited(remaining_seconds)),
        SubmitOutcome::Invalid(errors) => Err(validation_error(
            "One or more fields are invalid",
            json!(errors),
        )),
        // The storage error is logged by the service and never sent to clients.
        SubmitOutcome::Failed => Err(submission_failed()),
    }
}
