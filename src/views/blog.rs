use maud::{Markup, PreEscaped, html};
use url::form_urlencoded::byte_serialize;

use crate::blog::{BlogFilter, PostDetail, ShareLinks};
use crate::models::{post, post_category};

fn published_on(post: &post::Model) -> String {
    post.published_at.format("%-d %B %Y").to_string()
}

fn category_name<'a>(post: &post::Model, categories: &'a [post_category::Model]) -> Option<&'a str> {
    let id = post.category_id?;
    categories.iter().find(|c| c.id == id).map(|c| c.name.as_str())
}

fn tag_param(tag: &str) -> String {
    byte_serialize(tag.as_bytes()).collect()
}

pub fn blog_list_page(
    posts: &[post::Model],
    categories: &[post_category::Model],
    filter: &BlogFilter,
) -> Markup {
    let active_category = filter.category.as_deref().unwrap_or_default();

    html! {
        h1 { "News & Events" }
        nav.category-filter {
            a href="/blog" aria-current=[(!filter.is_active()).then_some("page")] { "All" }
            @for category in categories {
                a href={ "/blog?category=" (category.slug) }
                    aria-current=[(category.slug == active_category).then_some("page")] {
                    (category.name)
                }
            }
        }
        @if let Some(tag) = &filter.tag {
            p.tag-filter { "Tagged " strong { (tag) } " · " a href="/blog" { "Show all" } }
        }

        @if posts.is_empty() {
            p.empty-state { "No posts found." }
        }
        @for post in posts {
            article.card.post-summary {
                h2 { a href={ "/blog/" (post.slug) } { (post.title) } }
                p.meta {
                    time datetime=(post.published_at.to_rfc3339()) { (published_on(post)) }
                    @if let Some(name) = category_name(post, categories) {
                        " · " (name)
                    }
                    @if post.is_featured {
                        " " span.badge { "Featured" }
                    }
                }
                @if let Some(summary) = &post.summary {
                    p { (summary) }
                }
            }
        }
    }
}

/// Detail page. `body_html` must already be sanitized.
pub fn post_page(
    detail: &PostDetail,
    body_html: &str,
    share: &ShareLinks,
    calendar_href: &str,
) -> Markup {
    let post = &detail.post;
    let tags = post.tag_list();

    html! {
        article.post {
            header {
                @if let Some(category) = &detail.category {
                    a.category href={ "/blog?category=" (category.slug) } { (category.name) }
                }
                h1 { (post.title) }
                p.meta {
                    time datetime=(post.published_at.to_rfc3339()) { (published_on(post)) }
                }
            }

            @if let Some(starts_at) = post.event_starts_at {
                aside.event-details {
                    h2 { "Event details" }
                    p {
                        "When: " (starts_at.format("%-d %B %Y, %H:%M").to_string())
                        @if let Some(ends_at) = post.event_ends_at {
                            " to " (ends_at.format("%-d %B %Y, %H:%M").to_string())
                        }
                    }
                    @if let Some(location) = &post.event_location {
                        p { "Where: " (location) }
                    }
                }
            }

            div.post-body { (PreEscaped(body_html)) }

            p.add-to-calendar {
                a href=(calendar_href) download { "Add to calendar" }
            }

            @if !tags.is_empty() {
                ul.tags {
                    @for tag in &tags {
                        li { a href={ "/blog?tag=" (tag_param(tag)) } { "#" (tag) } }
                    }
                }
            }

            section.share {
                h2 { "Share" }
                @for (label, href) in share.targets() {
                    a href=(href) target="_blank" rel="noopener noreferrer" { (label) }
                    " "
                }
            }
        }

        nav.post-navigation {
            @if let Some(previous) = &detail.adjacent.previous {
                a.previous href={ "/blog/" (previous.slug) } rel="prev" { "← " (previous.title) }
            }
            @if let Some(next) = &detail.adjacent.next {
                a.next href={ "/blog/" (next.slug) } rel="next" { (next.title) " →" }
            }
        }

        @if !detail.related.is_empty() {
            section.related-posts {
                h2 { "Related posts" }
                ul {
                    @for related in &detail.related {
                        li { a href={ "/blog/" (related.slug) } { (related.title) } }
                    }
                }
            }
        }
    }
}

pub fn post_not_found(slug: &str) -> Markup {
    html! {
        section.not-found {
            h1 { "Post not found" }
            p { "We couldn't find a post called \u{201c}" (slug) "\u{201d}." }
            a href="/blog" { "Back to News & Events" }
        }
    }
}
