//! # HTML Page Handlers

use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use maud::Markup;
use serde::Deserialize;
use tracing::warn;

use crate::blog::{self, BlogFilter, CalendarEvent, ShareLinks, sanitize_html};
use crate::clock::Clock;
use crate::contact::{ClientKey, ContactForm, FieldErrors, SubmitOutcome};
use crate::data::DataOrigin;
use crate::directory::{DirectoryController, TenantQuery};
use crate::promotions::visible_promotions;
use crate::seo::InjectionPlan;
use crate::server::AppState;
use crate::views::{self, Layout, Section};

/// Cumulative pages rendered by one `/directory?page=N` request.
const MAX_DIRECTORY_PAGES: u64 = 50;

struct PageMeta<'a> {
    section: Section,
    title: &'a str,
    description: Option<&'a str>,
    offline: bool,
}

/// Wraps `content` in the site layout, injecting the current SEO settings.
async fn render(state: &AppState, meta: PageMeta<'_>, content: Markup) -> Html<String> {
    let settings = state.data.site_settings().await;
    let plan = InjectionPlan::build(&settings.data, &state.seo_policy);
    let layout = Layout {
        site_name: &state.config.site_name,
        title: meta.title,
        description: meta.description,
        section: meta.section,
        seo: &plan,
        offline: meta.offline,
    };
    Html(views::page(&layout, content).into_string())
}

pub async fn home(State(state): State<AppState>) -> Html<String> {
    let tenants = state.data.tenants(&TenantQuery::new(12)).await;
    let posts = state.data.posts().await;
    let promotions = state.data.promotions().await;
    let today = state.clock.now().date_naive();
    let offline = tenants.is_fallback() || posts.is_fallback() || promotions.is_fallback();

    let featured: Vec<_> = tenants
        .data
        .items
        .into_iter()
        .filter(|t| t.is_featured)
        .collect();
    let latest: Vec<_> = posts.data.iter().take(3).cloned().collect();
    let mut visible = visible_promotions(&promotions.data, today);
    visible.retain(|v| !v.upcoming);
    visible.truncate(3);

    let content = views::home::home_page(&state.config.site_name, &featured, &latest, &visible);
    render(
        &state,
        PageMeta {
            section: Section::Home,
            title: "Home",
            description: Some("Stores, dining, movies, events and promotions."),
            offline,
        },
        content,
    )
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub floor: Option<String>,
    pub page: Option<u64>,
}

impl DirectoryParams {
    fn to_query(&self, page_size: u64) -> TenantQuery {
        let mut query = TenantQuery::new(page_size);
        query.search = self.q.clone().unwrap_or_default();
        // Unparseable category ids behave like "all categories".
        query.category_id = self
            .category
            .as_deref()
            .and_then(|c| c.trim().parse::<i32>().ok());
        query.floor = self.floor.clone().filter(|f| !f.trim().is_empty());
        query
    }
}

pub async fn directory(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> Html<String> {
    let target_page = params.page.unwrap_or(1).clamp(1, MAX_DIRECTORY_PAGES);
    let mut controller = DirectoryController::with_filters(
        state.clock.clone(),
        params.to_query(state.config.directory.page_size),
        chrono::Duration::milliseconds(state.config.directory.search_debounce_ms as i64),
    );

    let mut request = controller.load();
    let shown_pages = loop {
        let result = state.data.tenants(&request.query).await;
        controller.apply(&request, Ok(result));
        let loaded = request.query.page;
        if loaded >= target_page {
            break loaded;
        }
        match controller.load_more() {
            Some(next) => request = next,
            None => break loaded,
        }
    };

    let categories = state.data.tenant_categories().await;
    let floors = state.data.floors().await;
    let view = controller.view();
    let offline = view.origin == Some(DataOrigin::Fallback)
        || categories.is_fallback()
        || floors.is_fallback();

    let content = views::directory::directory_page(&view, &categories.data, &floors.data, shown_pages);
    render(
        &state,
        PageMeta {
            section: Section::Directory,
            title: "Store Directory",
            description: Some("Find stores, restaurants and services by name, category or floor."),
            offline,
        },
        content,
    )
    .await
}

pub async fn blog_index(
    State(state): State<AppState>,
    Query(filter): Query<BlogFilter>,
) -> Html<String> {
    let posts = state.data.posts().await;
    let categories = state.data.post_categories().await;
    let offline = posts.is_fallback() || categories.is_fallback();
    let filtered = filter.apply(posts.data, &categories.data);

    let content = views::blog::blog_list_page(&filtered, &categories.data, &filter);
    render(
        &state,
        PageMeta {
            section: Section::Blog,
            title: "News & Events",
            description: Some("The latest news, events and offers."),
            offline,
        },
        content,
    )
    .await
}

pub async fn blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let detail = match blog::post_detail(&state.data, &slug).await {
        Ok(detail) => detail,
        Err(err) => {
            if !err.is_not_found() {
                warn!(slug = %slug, error = %err, "Post lookup failed");
            }
            let page = render(
                &state,
                PageMeta {
                    section: Section::Blog,
                    title: "Post not found",
                    description: None,
                    offline: false,
                },
                views::blog::post_not_found(&slug),
            )
            .await;
            return (StatusCode::NOT_FOUND, page).into_response();
        }
    };

    let page_url = state.config.absolute_url(&format!("blog/{}", detail.post.slug));
    let share = ShareLinks::new(&page_url, &detail.post.title);
    let calendar_href = format!("/blog/{}/calendar.ics", detail.post.slug);
    let body = sanitize_html(&detail.post.body);
    let title = detail.post.title.clone();
    let description = detail.post.summary.clone();

    let content = views::blog::post_page(&detail, &body, &share, &calendar_href);
    render(
        &state,
        PageMeta {
            section: Section::Blog,
            title: &title,
            description: description.as_deref(),
            offline: detail.origin == DataOrigin::Fallback,
        },
        content,
    )
    .await
    .into_response()
}

pub async fn blog_calendar(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let post = match blog::resolve_post(&state.data, &slug).await {
        Ok(resolved) => resolved.data,
        Err(_) => return not_found_page(&state).await.into_response(),
    };

    let page_url = state.config.absolute_url(&format!("blog/{}", post.slug));
    let event = CalendarEvent::from_post(&post, &state.config.site_host(), Some(page_url));
    let ics = event.to_ics(state.clock.now());

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}.ics\"", post.slug))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/calendar; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    )
        .into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct MoviesParams {
    pub cinema: Option<String>,
    pub q: Option<String>,
}

/// Resolves the requested cinema against the configured ones.
pub(crate) fn cinema_id<'a>(state: &'a AppState, requested: Option<&str>) -> &'a str {
    let configured = &state.config.cinema.cinema_ids;
    requested
        .and_then(|id| configured.iter().find(|c| c.as_str() == id.trim()))
        .map(String::as_str)
        .unwrap_or_else(|| state.config.cinema.default_cinema_id())
}

pub async fn movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesParams>,
) -> Html<String> {
    let cinema_id = cinema_id(&state, params.cinema.as_deref()).to_string();
    let snapshot = state.cinema.schedule(&cinema_id).await;
    let query = params.q.unwrap_or_default();

    let content = views::movies::movies_page(&snapshot, &state.config.cinema.cinema_ids, &query);
    render(
        &state,
        PageMeta {
            section: Section::Movies,
            title: "Movies",
            description: Some("Today's showtimes and ticket prices."),
            // The movies view has its own data-source banner.
            offline: false,
        },
        content,
    )
    .await
}

pub async fn promotions(State(state): State<AppState>) -> Html<String> {
    let promotions = state.data.promotions().await;
    let visible = visible_promotions(&promotions.data, state.clock.now().date_naive());

    let content = views::promotions::promotions_page(&visible);
    render(
        &state,
        PageMeta {
            section: Section::Promotions,
            title: "Promotions",
            description: Some("Current and upcoming offers from our stores."),
            offline: promotions.is_fallback(),
        },
        content,
    )
    .await
}

fn contact_meta() -> PageMeta<'static> {
    PageMeta {
        section: Section::Contact,
        title: "Contact us",
        description: Some("Send an enquiry to the centre management team."),
        offline: false,
    }
}

pub async fn contact_form(State(state): State<AppState>) -> Html<String> {
    let content = views::contact::contact_page(
        &ContactForm::default(),
        &FieldErrors::new(),
        views::contact::ContactNotice::None,
    );
    render(&state, contact_meta(), content).await
}

pub async fn contact_submit(
    State(state): State<AppState>,
    client: ClientKey,
    Form(form): Form<ContactForm>,
) -> Response {
    use views::contact::ContactNotice;

    let submitted = form.clone();
    let (status, content) = match state.contact.submit(&client, form).await {
        SubmitOutcome::Accepted(contact) => {
            (StatusCode::OK, views::contact::contact_sent(&contact.name))
        }
        // Bots get the same confirmation as people.
        SubmitOutcome::Rejected => (StatusCode::OK, views::contact::contact_sent("")),
        SubmitOutcome::Wait { remaining_seconds } => (
            StatusCode::TOO_MANY_REQUESTS,
            views::contact::contact_page(
                &submitted,
                &FieldErrors::new(),
                ContactNotice::Wait { remaining_seconds },
            ),
        ),
        SubmitOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            views::contact::contact_page(&submitted, &errors, ContactNotice::None),
        ),
        SubmitOutcome::Failed => (
            StatusCode::BAD_GATEWAY,
            views::contact::contact_page(
                &submitted,
                &FieldErrors::new(),
                ContactNotice::SubmissionFailed,
            ),
        ),
    };

    let page = render(&state, contact_meta(), content).await;
    (status, page).into_response()
}

async fn not_found_page(state: &AppState) -> (StatusCode, Html<String>) {
    let page = render(
        state,
        PageMeta {
            section: Section::Home,
            title: "Page not found",
            description: None,
            offline: false,
        },
        views::not_found("The page you were looking for doesn't exist."),
    )
    .await;
    (StatusCode::NOT_FOUND, page)
}

pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    not_found_page(&state).await
}
