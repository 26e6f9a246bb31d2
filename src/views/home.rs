use maud::{Markup, html};

use crate::models::{post, tenant};
use crate::promotions::VisiblePromotion;

pub fn home_page(
    site_name: &str,
    featured: &[tenant::Model],
    latest_posts: &[post::Model],
    promotions: &[VisiblePromotion],
) -> Markup {
    html! {
        section.hero {
            h1 { "Welcome to " (site_name) }
            p { "Shops, dining, movies and events under one roof." }
            a href="/directory" { "Find a store" }
        }

        @if !featured.is_empty() {
            section.featured-stores {
                h2 { "Featured stores" }
                ul {
                    @for tenant in featured {
                        li {
                            (tenant.name)
                            @if let Some(floor) = &tenant.floor {
                                " (" (floor) ")"
                            }
                        }
                    }
                }
            }
        }

        @if !latest_posts.is_empty() {
            section.latest-posts {
                h2 { "News & Events" }
                @for post in latest_posts {
                    article.card {
                        h3 { a href={ "/blog/" (post.slug) } { (post.title) } }
                        @if let Some(summary) = &post.summary {
                            p { (summary) }
                        }
                    }
                }
            }
        }

        @if !promotions.is_empty() {
            section.current-promotions {
                h2 { "Promotions" }
                ul {
                    @for visible in promotions {
                        li { (visible.promotion.title) }
                    }
                }
                a href="/promotions" { "All promotions" }
            }
        }
    }
}
