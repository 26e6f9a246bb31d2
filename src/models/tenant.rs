//! Tenant entity model
//!
//! A shop, restaurant or service occupying a unit in the mall.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "tenants")]
#[schema(as = Tenant)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Trading name shown on the directory card
    pub name: String,

    /// Parent brand, when it differs from the trading name
    pub brand_name: Option<String>,

    pub category_id: Option<i32>,

    /// Floor label as printed on the mall map (e.g. "G", "L1", "B1")
    pub floor: Option<String>,

    pub logo_url: Option<String>,

    pub is_featured: bool,

    pub is_new: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Semi-structured opening hours, e.g. `{"mon-fri": "10:00-22:00"}`
    #[schema(value_type = Option<Object>)]
    pub operating_hours: Option<Json>,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Characters stripped before deciding a name is blank. The tenant query
/// trims the same set in SQL.
pub const NAME_PADDING: [char; 4] = [' ', '\t', '\n', '\r'];

impl Model {
    /// Records without a usable name, or switched off upstream, are never listed.
    pub fn is_listable(&self) -> bool {
        self.is_active && !self.name.trim_matches(NAME_PADDING).is_empty()
    }

    /// Opening hours flattened into `(label, hours)` pairs for display.
    ///
    /// Objects keep their key order; a bare string becomes a single "Daily" row.
    pub fn opening_hours(&self) -> Vec<(String, String)> {
        match &self.operating_hours {
            Some(Json::Object(map)) => map
                .iter()
                .filter_map(|(day, hours)| hours.as_str().map(|h| (day.clone(), h.to_string())))
                .collect(),
            Some(Json::String(hours)) => vec![("Daily".to_string(), hours.clone())],
            _ => Vec::new(),
        }
    }
}
