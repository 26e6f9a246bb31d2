use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use super::catalog;
use crate::models::{
    Post, PostCategory, Promotion, Tenant, TenantCategory, post, post_category, promotion, tenant,
    tenant_category,
};

/// Loads the bundled content into an empty database.
///
/// Each table is only seeded when it has no rows, so running the command
/// twice is harmless. Categories go in before the rows that reference them.
pub async fn seed_database(db: &DatabaseConnection) -> Result<()> {
    if TenantCategory::find().count(db).await? == 0 {
        let rows = catalog::tenant_categories();
        log::info!("Seeding {} tenant categories", rows.len());
        TenantCategory::insert_many(rows.into_iter().map(tenant_category::ActiveModel::from))
            .exec(db)
            .await
            .context("seeding tenant categories")?;
    } else {
        log::info!("Tenant categories already present, skipping");
    }

    if Tenant::find().count(db).await? == 0 {
        let rows = catalog::tenants();
        log::info!("Seeding {} tenants", rows.len());
        Tenant::insert_many(rows.into_iter().map(tenant::ActiveModel::from))
            .exec(db)
            .await
            .context("seeding tenants")?;
    } else {
        log::info!("Tenants already present, skipping");
    }

    if PostCategory::find().count(db).await? == 0 {
        let rows = catalog::post_categories();
        log::info!("Seeding {} post categories", rows.len());
        PostCategory::insert_many(rows.into_iter().map(post_category::ActiveModel::from))
            .exec(db)
            .await
            .context("seeding post categories")?;
    } else {
        log::info!("Post categories already present, skipping");
    }

    if Post::find().count(db).await? == 0 {
        let rows = catalog::posts();
        log::info!("Seeding {} posts", rows.len());
        Post::insert_many(rows.into_iter().map(post::ActiveModel::from))
            .exec(db)
            .await
            .context("seeding posts")?;
    } else {
        log::info!("Posts already present, skipping");
    }

    if Promotion::find().count(db).await? == 0 {
        let rows = catalog::promotions();
        log::info!("Seeding {} promotions", rows.len());
        Promotion::insert_many(rows.into_iter().map(promotion::ActiveModel::from))
            .exec(db)
            .await
            .context("seeding promotions")?;
    } else {
        log::info!("Promotions already present, skipping");
    }

    log::info!("Content seeding completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::migrated_db;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = migrated_db().await;

        seed_database(&db).await.unwrap();
        seed_database(&db).await.unwrap();

        assert_eq!(
            Tenant::find().count(&db).await.unwrap(),
            catalog::tenants().len() as u64
        );
        assert_eq!(
            Post::find().count(&db).await.unwrap(),
            catalog::posts().len() as u64
        );
    }
}
