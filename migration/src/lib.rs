//! Schema mirror for the mall site.
//!
//! The production schema is owned by the managed database. These migrations
//! reproduce the tables the site reads so local development and tests can run
//! against SQLite or a scratch Postgres instance.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_000001_create_tenant_directory;
mod m2025_01_10_000002_create_blog;
mod m2025_01_10_000003_create_promotions;
mod m2025_01_10_000004_create_site_settings;
mod m2025_01_10_000005_create_contacts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_000001_create_tenant_directory::Migration),
            Box::new(m2025_01_10_000002_create_blog::Migration),
            Box::new(m2025_01_10_000003_create_promotions::Migration),
            Box::new(m2025_01_10_000004_create_site_settings::Migration),
            Box::new(m2025_01_10_000005_create_contacts::Migration),
        ]
    }
}
