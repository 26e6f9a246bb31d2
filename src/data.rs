//! Site-wide data access with offline fallback.
//!
//! Every read goes to the database first. When that fails the bundled seed
//! content is served instead, the failure is logged and counted, and the
//! result is tagged [`DataOrigin::Fallback`] so pages can show a banner.
//! Contact submissions have no fallback: a failed insert is reported to the
//! caller.

use std::sync::Arc;

use metrics::counter;
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::directory::{Page, TenantQuery, filter_fallback};
use crate::error::DataError;
use crate::models::{contact, post, post_category, promotion, site_setting, tenant, tenant_category};
use crate::repositories::{
    ContactRepository, NewContact, PostRepository, PromotionRepository, SiteSettingRepository,
    TenantRepository,
};
use crate::seeds;

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Remote,
    Fallback,
}

/// A value tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Sourced<T> {
    pub fn remote(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Remote,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}

/// Bundled content held in memory for the fallback path.
#[derive(Debug, Clone)]
struct FallbackContent {
    tenants: Vec<tenant::Model>,
    tenant_categories: Vec<tenant_category::Model>,
    posts: Vec<post::Model>,
    post_categories: Vec<post_category::Model>,
    promotions: Vec<promotion::Model>,
}

impl FallbackContent {
    fn bundled() -> Self {
        let mut posts = seeds::posts();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Self {
            tenants: seeds::tenants(),
            tenant_categories: seeds::tenant_categories(),
            posts,
            post_categories: seeds::post_categories(),
            promotions: seeds::promotions(),
        }
    }
}

/// Shared data-access layer.
#[derive(Debug, Clone)]
pub struct SiteData {
    db: Option<DatabaseConnection>,
    fallback: Arc<FallbackContent>,
}

impl SiteData {
    /// `None` runs entirely on bundled content.
    pub fn new(db: Option<DatabaseConnection>) -> Self {
        Self {
            db,
            fallback: Arc::new(FallbackContent::bundled()),
        }
    }

    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    pub fn connection(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    fn db(&self) -> Result<&DatabaseConnection, DataError> {
        self.db.as_ref().ok_or_else(|| {
            DataError::Remote(DbErr::Conn(RuntimeErr::Internal(
                "no database connection configured".to_string(),
            )))
        })
    }

    fn fall_back<T>(&self, resource: &'static str, err: DataError, data: T) -> Sourced<T> {
        warn!(resource, error = %err, "Remote read failed, serving bundled data");
        counter!("mall_data_fallback_total", "resource" => resource).increment(1);
        Sourced::fallback(data)
    }

    pub async fn tenants(&self, query: &TenantQuery) -> Sourced<Page<tenant::Model>> {
        let remote = match self.db() {
            Ok(db) => TenantRepository::new(db)
                .list(query)
                .await
                .map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(page) => Sourced::remote(page),
            Err(err) => {
                let page = filter_fallback(&self.fallback.tenants, query);
                self.fall_back("tenants", err, page)
            }
        }
    }

    pub async fn tenant_categories(&self) -> Sourced<Vec<tenant_category::Model>> {
        let remote = match self.db() {
            Ok(db) => TenantRepository::new(db)
                .categories()
                .await
                .map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(categories) => Sourced::remote(categories),
            Err(err) => {
                let mut categories = self.fallback.tenant_categories.clone();
                categories.sort_by_key(|c| c.sort_order);
                self.fall_back("tenant_categories", err, categories)
            }
        }
    }

    /// Floor labels for the directory filter.
    pub async fn floors(&self) -> Sourced<Vec<String>> {
        let remote = match self.db() {
            Ok(db) => TenantRepository::new(db)
                .floors()
                .await
                .map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(floors) => Sourced::remote(floors),
            Err(err) => {
                let mut floors: Vec<String> = self
                    .fallback
                    .tenants
                    .iter()
                    .filter(|t| t.is_listable())
                    .filter_map(|t| t.floor.clone())
                    .collect();
                floors.sort();
                floors.dedup();
                self.fall_back("floors", err, floors)
            }
        }
    }

    /// All posts, newest first.
    pub async fn posts(&self) -> Sourced<Vec<post::Model>> {
        let remote = match self.db() {
            Ok(db) => PostRepository::new(db).list().await.map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(posts) => Sourced::remote(posts),
            Err(err) => self.fall_back("posts", err, self.fallback.posts.clone()),
        }
    }

    /// Remote lookup only; see [`crate::blog::resolve_post`] for the fallback.
    pub async fn remote_post(&self, slug: &str) -> Result<Option<post::Model>, DataError> {
        let db = self.db()?;
        Ok(PostRepository::new(db).find_by_slug(slug).await?)
    }

    /// Bundled post with this slug.
    pub fn fallback_post(&self, slug: &str) -> Option<post::Model> {
        self.fallback.posts.iter().find(|p| p.slug == slug).cloned()
    }

    pub async fn post_categories(&self) -> Sourced<Vec<post_category::Model>> {
        let remote = match self.db() {
            Ok(db) => PostRepository::new(db)
                .categories()
                .await
                .map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(categories) => Sourced::remote(categories),
            Err(err) => self.fall_back(
                "post_categories",
                err,
                self.fallback.post_categories.clone(),
            ),
        }
    }

    pub async fn promotions(&self) -> Sourced<Vec<promotion::Model>> {
        let remote = match self.db() {
            Ok(db) => PromotionRepository::new(db)
                .list()
                .await
                .map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(promotions) => Sourced::remote(promotions),
            Err(err) => self.fall_back("promotions", err, self.fallback.promotions.clone()),
        }
    }

    /// Active SEO settings. Nothing is injected when the store is unreachable.
    pub async fn site_settings(&self) -> Sourced<Vec<site_setting::Model>> {
        let remote = match self.db() {
            Ok(db) => SiteSettingRepository::new(db)
                .active()
                .await
                .map_err(DataError::from),
            Err(err) => Err(err),
        };
        match remote {
            Ok(settings) => Sourced::remote(settings),
            Err(err) => self.fall_back("site_settings", err, Vec::new()),
        }
    }

    pub async fn submit_contact(&self, new: NewContact) -> Result<contact::Model, DataError> {
        let db = self.db()?;
        let created = ContactRepository::new(db).create(new).await?;
        tracing::info!(
            contact_id = %created.id,
            enquiry_type = %created.enquiry_type,
            "Contact enquiry stored"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::migrated_db;

    #[tokio::test]
    async fn offline_serves_bundled_tenants() {
        let data = SiteData::offline();

        let page = data.tenants(&TenantQuery::new(100)).await;

        assert!(page.is_fallback());
        assert_eq!(
            page.data.total as usize,
            seeds::tenants().iter().filter(|t| t.is_listable()).count()
        );
    }

    #[tokio::test]
    async fn unmigrated_database_falls_back() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let data = SiteData::new(Some(db));

        let posts = data.posts().await;

        assert!(posts.is_fallback());
        assert_eq!(posts.data.len(), seeds::posts().len());
        assert!(data.site_settings().await.data.is_empty());
    }

    #[tokio::test]
    async fn connected_reads_are_remote() {
        let db = migrated_db().await;
        seeds::seed_database(&db).await.unwrap();
        let data = SiteData::new(Some(db));

        let categories = data.tenant_categories().await;
        assert_eq!(categories.origin, DataOrigin::Remote);
        assert_eq!(categories.data.len(), seeds::tenant_categories().len());

        let post = data.remote_post("summer-fashion-week-2025").await.unwrap();
        assert!(post.is_some());
    }

    #[tokio::test]
    async fn submit_contact_without_database_fails() {
        let data = SiteData::offline();

        let result = data
            .submit_contact(NewContact {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
                enquiry_type: "general".to_string(),
                enquiry_details: "What time do you open?".to_string(),
                created_at: chrono::Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(DataError::Remote(_))));
    }

    #[test]
    fn fallback_posts_are_newest_first() {
        let data = SiteData::offline();
        let posts = &data.fallback.posts;
        assert!(
            posts
                .windows(2)
                .all(|pair| pair[0].published_at >= pair[1].published_at)
        );
        assert!(data.fallback_post("cinema-imax-upgrade").is_some());
        assert!(data.fallback_post("nope").is_none());
    }
}
