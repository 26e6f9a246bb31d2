//! # Repository Layer
//!
//! Thin SeaORM query wrappers over the mirrored content tables. Errors are
//! returned as [`sea_orm::DbErr`]; deciding whether to fall back to bundled
//! data is the job of [`crate::data::SiteData`].

pub mod contact;
pub mod post;
pub mod promotion;
pub mod site_setting;
pub mod tenant;

pub use contact::{ContactRepository, NewContact};
pub use post::PostRepository;
pub use promotion::PromotionRepository;
pub use site_setting::SiteSettingRepository;
pub use tenant::TenantRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    /// Fresh in-memory SQLite database with the mirrored schema applied.
    pub async fn migrated_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        db
    }
}
