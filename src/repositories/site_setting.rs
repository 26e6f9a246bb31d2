//! # Site Setting Repository

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::models::site_setting::{self, Entity as SiteSetting};

pub struct SiteSettingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SiteSettingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active settings in injection order.
    pub async fn active(&self) -> Result<Vec<site_setting::Model>, DbErr> {
        SiteSetting::find()
            .filter(site_setting::Column::IsActive.eq(true))
            .order_by_asc(site_setting::Column::SortOrder)
            .order_by_asc(site_setting::Column::Key)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::migrated_db;
    use sea_orm::{ActiveModelTrait, Set};

    #[tokio::test]
    async fn test_active_skips_disabled_and_orders() {
        let db = migrated_db().await;
        for (key, sort_order, is_active) in [("b", 1, true), ("a", 1, true), ("off", 0, false)] {
            site_setting::ActiveModel {
                key: Set(key.to_string()),
                injection_point: Set("head".to_string()),
                setting_type: Set("meta_tag".to_string()),
                value: Set(r#"{"name":"robots","content":"index"}"#.to_string()),
                is_active: Set(is_active),
                sort_order: Set(sort_order),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let keys: Vec<_> = SiteSettingRepository::new(&db)
            .active()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.key)
            .collect();

        assert_eq!(keys, vec!["a", "b"]);
    }
}
