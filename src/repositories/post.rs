//! # Post Repository
//!
//! Blog reads over `posts` and `post_categories`.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::models::post::{self, Entity as Post};
use crate::models::post_category::{self, Entity as PostCategory};

/// Repository for blog post reads
pub struct PostRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PostRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<post::Model>, DbErr> {
        Post::find()
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<post::Model>, DbErr> {
        Post::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.db)
            .await
    }

    pub async fn categories(&self) -> Result<Vec<post_category::Model>, DbErr> {
        PostCategory::find()
            .order_by_asc(post_category::Column::Name)
            .all(self.db)
            .await
    }
}
