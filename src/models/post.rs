//! Blog post entity model
//!
//! Posts are authored in the external CMS. `body` is rich-text HTML and is
//! always passed through [`crate::blog::sanitize_html`] before rendering.

use chrono::{DateTime, Utc};
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "posts")]
#[schema(as = Post)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub slug: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub category_id: Option<i32>,

    /// JSON array of tag strings
    #[schema(value_type = Vec<String>)]
    pub tags: Json,

    #[schema(value_type = String, format = DateTime)]
    pub published_at: DateTimeWithTimeZone,

    pub is_featured: bool,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub event_starts_at: Option<DateTimeWithTimeZone>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub event_ends_at: Option<DateTimeWithTimeZone>,

    pub event_location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Tags as plain strings; non-string entries are ignored.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|tag| tag.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn published_at_utc(&self) -> DateTime<Utc> {
        self.published_at.with_timezone(&Utc)
    }
}
