use maud::{Markup, html};
use url::form_urlencoded;

use crate::directory::{DirectoryView, TenantQuery};
use crate::models::{tenant, tenant_category};

/// `/directory` link for the given filters showing pages `1..=page`.
pub fn directory_href(filters: &TenantQuery, page: u64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(term) = filters.search_term() {
        query.append_pair("q", term);
    }
    if let Some(category_id) = filters.category_id {
        query.append_pair("category", &category_id.to_string());
    }
    if let Some(floor) = filters.floor_filter() {
        query.append_pair("floor", floor);
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    let query = query.finish();
    if query.is_empty() {
        "/directory".to_string()
    } else {
        format!("/directory?{query}")
    }
}

pub fn directory_page(
    view: &DirectoryView<'_>,
    categories: &[tenant_category::Model],
    floors: &[String],
    shown_pages: u64,
) -> Markup {
    let filters = view.filters;

    html! {
        h1 { "Store Directory" }
        form.directory-filters method="get" action="/directory" role="search" {
            label {
                "Search "
                input type="search" name="q" value=(filters.search) placeholder="Store, brand or keyword";
            }
            label {
                "Category "
                select name="category" {
                    option value="" { "All categories" }
                    @for category in categories {
                        option value=(category.id) selected[filters.category_id == Some(category.id)] {
                            (category.display_name)
                        }
                    }
                }
            }
            label {
                "Floor "
                select name="floor" {
                    option value="" { "All floors" }
                    @for floor in floors {
                        option value=(floor) selected[filters.floor_filter() == Some(floor.as_str())] {
                            (floor)
                        }
                    }
                }
            }
            button type="submit" { "Search" }
        }

        @if let Some(error) = view.error {
            div.banner.banner-error role="alert" { (error) }
        }

        @if view.is_empty {
            div.empty-state {
                p { "No stores match your search." }
                @if view.can_clear_filters {
                    a.clear-filters href="/directory" { "Clear filters" }
                }
            }
        } @else {
            p.result-count { (view.total) " stores" }
            div.tenant-grid {
                @for tenant in view.tenants {
                    (tenant_card(tenant, categories))
                }
            }
            @if view.has_more {
                a.load-more href=(directory_href(filters, shown_pages + 1)) { "Load more" }
            }
        }
    }
}

fn tenant_card(tenant: &tenant::Model, categories: &[tenant_category::Model]) -> Markup {
    let category = tenant
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id));
    let hours = tenant.opening_hours();

    html! {
        article.card.tenant-card {
            @if let Some(logo) = &tenant.logo_url {
                img src=(logo) alt={ (tenant.name) " logo" } loading="lazy";
            }
            h2 { (tenant.name) }
            @if tenant.is_featured {
                span.badge { "Featured" }
            }
            @if tenant.is_new {
                span.badge { "New" }
            }
            @if let Some(brand) = &tenant.brand_name {
                p.brand { (brand) }
            }
            p.meta {
                @if let Some(category) = category {
                    (category.display_name)
                }
                @if let Some(floor) = &tenant.floor {
                    " · Floor " (floor)
                }
            }
            @if let Some(description) = &tenant.description {
                p { (description) }
            }
            @if !hours.is_empty() {
                dl.hours {
                    @for (days, time) in &hours {
                        dt { (days) }
                        dd { (time) }
                    }
                }
            }
        }
    }
}
