//! Promotion entity model

use chrono::NaiveDate;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "promotions")]
#[schema(as = Promotion)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tenant_id: Option<i32>,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub image_url: Option<String>,

    pub starts_on: NaiveDate,

    pub ends_on: NaiveDate,

    /// `staging`, `published` or `expired`
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
