//! # Data Models
//!
//! SeaORM entities mirroring the tables of the mall's managed database. The
//! bundled fallback data in [`crate::seeds`] is expressed with the same models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod contact;
pub mod post;
pub mod post_category;
pub mod promotion;
pub mod site_setting;
pub mod tenant;
pub mod tenant_category;

pub use contact::Entity as Contact;
pub use post::Entity as Post;
pub use post_category::Entity as PostCategory;
pub use promotion::Entity as Promotion;
pub use site_setting::Entity as SiteSetting;
pub use tenant::Entity as Tenant;
pub use tenant_category::Entity as TenantCategory;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "mall-site".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
