//! Site setting entity model
//!
//! Admin-authored fragments injected into page head or body. Parsing and the
//! trust decision live in [`crate::seo`].

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub key: String,

    /// `head`, `body_start` or `body_end`
    pub injection_point: String,

    /// `meta_tag`, `script`, `link`, `json_ld` or `custom_html`
    pub setting_type: String,

    #[sea_orm(column_type = "Text")]
    pub value: String,

    pub is_active: bool,

    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
