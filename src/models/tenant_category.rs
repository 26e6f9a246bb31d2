//! Tenant category entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "tenant_categories")]
#[schema(as = TenantCategory)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stable key, e.g. "food-beverage"
    pub name: String,

    pub display_name: String,

    pub icon: Option<String>,

    /// Tenant count as maintained upstream
    pub tenant_count: i32,

    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
