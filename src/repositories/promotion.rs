//! # Promotion Repository

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::models::promotion::{self, Entity as Promotion};

pub struct PromotionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PromotionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every promotion regardless of status, ordered by start date.
    pub async fn list(&self) -> Result<Vec<promotion::Model>, DbErr> {
        Promotion::find()
            .order_by_asc(promotion::Column::StartsOn)
            .order_by_asc(promotion::Column::Id)
            .all(self.db)
            .await
    }
}
