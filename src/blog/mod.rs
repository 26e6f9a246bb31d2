//! # Blog
//!
//! Post lookup with offline fallback, related and adjacent post selection,
//! body sanitization, calendar export and share links.

use std::cmp::Reverse;

use metrics::counter;
use serde::Deserialize;
use tracing::warn;

use crate::data::{DataOrigin, SiteData, Sourced};
use crate::error::DataError;
use crate::models::{post, post_category};

pub mod ics;
pub mod sanitize;
pub mod share;

pub use ics::CalendarEvent;
pub use sanitize::{plain_text, sanitize_html};
pub use share::ShareLinks;

pub const RELATED_LIMIT: usize = 3;

/// Fetches a post by slug, falling back to the bundled posts when the remote
/// store fails or doesn't have it.
pub async fn resolve_post(data: &SiteData, slug: &str) -> Result<Sourced<post::Model>, DataError> {
    match data.remote_post(slug).await {
        Ok(Some(post)) => return Ok(Sourced::remote(post)),
        Ok(None) => {}
        Err(err) => {
            warn!(slug, error = %err, "Remote post lookup failed, trying bundled posts");
            counter!("mall_data_fallback_total", "resource" => "post").increment(1);
        }
    }

    data.fallback_post(slug)
        .map(Sourced::fallback)
        .ok_or_else(|| DataError::not_found(format!("post '{slug}'")))
}

fn relatedness(post: &post::Model, candidate: &post::Model) -> u32 {
    let mut score = 0;
    if post.category_id.is_some() && post.category_id == candidate.category_id {
        score += 2;
    }
    let candidate_tags: Vec<String> = candidate
        .tag_list()
        .iter()
        .map(|t| t.to_lowercase())
        .collect();
    let mut own_tags: Vec<String> = post.tag_list().iter().map(|t| t.to_lowercase()).collect();
    own_tags.sort();
    own_tags.dedup();
    score += own_tags
        .iter()
        .filter(|tag| candidate_tags.contains(tag))
        .count() as u32;
    score
}

/// Up to `limit` posts sharing a category (worth 2) or tags (1 each) with
/// `post`, best score first, newer first on ties.
pub fn related_posts(post: &post::Model, candidates: &[post::Model], limit: usize) -> Vec<post::Model> {
    let mut scored: Vec<(u32, &post::Model)> = candidates
        .iter()
        .filter(|c| c.slug != post.slug)
        .map(|c| (relatedness(post, c), c))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by_key(|(score, c)| (Reverse(*score), Reverse(c.published_at)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, c)| c.clone())
        .collect()
}

/// Neighbours of a post in a newest-first listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacentPosts {
    /// The next-older post
    pub previous: Option<post::Model>,
    /// The next-newer post
    pub next: Option<post::Model>,
}

pub fn adjacent_posts(post: &post::Model, ordered: &[post::Model]) -> AdjacentPosts {
    let Some(index) = ordered.iter().position(|p| p.slug == post.slug) else {
        return AdjacentPosts::default();
    };
    AdjacentPosts {
        previous: ordered.get(index + 1).cloned(),
        next: index
            .checked_sub(1)
            .and_then(|newer| ordered.get(newer))
            .cloned(),
    }
}

/// `/blog` listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogFilter {
    /// Category slug
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl BlogFilter {
    fn category_slug(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.category_slug().is_some() || self.tag().is_some()
    }

    /// Applies the filter. An unknown category slug matches nothing.
    pub fn apply(&self, posts: Vec<post::Model>, categories: &[post_category::Model]) -> Vec<post::Model> {
        let category_id = match self.category_slug() {
            Some(slug) => match categories.iter().find(|c| c.slug.eq_ignore_ascii_case(slug)) {
                Some(category) => Some(category.id),
                None => return Vec::new(),
            },
            None => None,
        };
        posts
            .into_iter()
            .filter(|p| category_id.is_none() || p.category_id == category_id)
            .filter(|p| self.tag().is_none_or(|tag| p.has_tag(tag)))
            .collect()
    }
}

/// Everything the detail page shows besides the post itself.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: post::Model,
    pub origin: DataOrigin,
    pub category: Option<post_category::Model>,
    pub related: Vec<post::Model>,
    pub adjacent: AdjacentPosts,
}

pub async fn post_detail(data: &SiteData, slug: &str) -> Result<PostDetail, DataError> {
    let resolved = resolve_post(data, slug).await?;
    let listing = data.posts().await;
    let categories = data.post_categories().await;

    let post = resolved.data;
    let origin = if resolved.origin == DataOrigin::Fallback || listing.is_fallback() {
        DataOrigin::Fallback
    } else {
        DataOrigin::Remote
    };
    let category = post
        .category_id
        .and_then(|id| categories.data.iter().find(|c| c.id == id).cloned());

    Ok(PostDetail {
        related: related_posts(&post, &listing.data, RELATED_LIMIT),
        adjacent: adjacent_posts(&post, &listing.data),
        category,
        origin,
        post,
    })
}
