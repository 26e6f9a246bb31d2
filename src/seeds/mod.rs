//! Bundled site content.
//!
//! The same records serve two purposes: they are the offline fallback returned
//! by [`crate::data::SiteData`] whenever the database cannot answer, and they
//! are what the `seed` command loads into a fresh database.

mod catalog;
mod database;

pub use catalog::{
    CATEGORY_ELECTRONICS, CATEGORY_ENTERTAINMENT, CATEGORY_FASHION, CATEGORY_FOOD,
    CATEGORY_HEALTH_BEAUTY, CATEGORY_SERVICES, post_categories, posts, promotions,
    sample_schedule, tenant_categories, tenants,
};
pub use database::seed_database;
