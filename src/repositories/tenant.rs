//! # Tenant Repository
//!
//! Directory queries over `tenants` and `tenant_categories`.

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::directory::{Page, TenantQuery};
use crate::models::tenant::{self, Entity as Tenant};
use crate::models::tenant_category::{self, Entity as TenantCategory};

/// Repository for tenant directory reads
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// One page of listable tenants matching `query`, featured first then by name.
    pub async fn list(&self, query: &TenantQuery) -> Result<Page<tenant::Model>, DbErr> {
        let mut select = Tenant::find()
            .filter(tenant::Column::IsActive.eq(true))
            .filter(named(self.db.get_database_backend()));

        if let Some(category_id) = query.category_id {
            select = select.filter(tenant::Column::CategoryId.eq(category_id));
        }

        if let Some(floor) = query.floor_filter() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(tenant::Column::Floor)))
                    .eq(floor.to_ascii_lowercase()),
            );
        }

        if let Some(term) = query.search_term() {
            let pattern = format!("%{}%", escape_like(&term.to_ascii_lowercase()));
            let like = |column: tenant::Column| {
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            select = select.filter(
                Condition::any()
                    .add(like(tenant::Column::Name))
                    .add(like(tenant::Column::BrandName))
                    .add(like(tenant::Column::Description)),
            );
        }

        let paginator = select
            .order_by_desc(tenant::Column::IsFeatured)
            .order_by(
                Expr::expr(Func::lower(Expr::col(tenant::Column::Name))),
                Order::Asc,
            )
            .order_by_asc(tenant::Column::Id)
            .paginate(self.db, query.page_size.max(1));

        let total = paginator.num_items().await?;
        let page = query.page.max(1);
        let mut items = paginator.fetch_page(page - 1).await?;
        items.retain(tenant::Model::is_listable);

        Ok(Page {
            items,
            total,
            page,
            page_size: query.page_size.max(1),
        })
    }

    /// Categories in display order.
    pub async fn categories(&self) -> Result<Vec<tenant_category::Model>, DbErr> {
        TenantCategory::find()
            .order_by_asc(tenant_category::Column::SortOrder)
            .order_by_asc(tenant_category::Column::DisplayName)
            .all(self.db)
            .await
    }

    /// Distinct floor labels of listable tenants, sorted.
    pub async fn floors(&self) -> Result<Vec<String>, DbErr> {
        let mut floors: Vec<String> = Tenant::find()
            .filter(tenant::Column::IsActive.eq(true))
            .filter(tenant::Column::Floor.is_not_null())
            .all(self.db)
            .await?
            .into_iter()
            .filter_map(|t| t.floor)
            .filter(|f| !f.trim().is_empty())
            .collect();
        floors.sort();
        floors.dedup();
        Ok(floors)
    }
}

/// Non-blank names, trimming the same characters as [`tenant::NAME_PADDING`].
fn named(backend: DbBackend) -> SimpleExpr {
    let chr = match backend {
        DbBackend::Postgres => "chr",
        _ => "char",
    };
    Expr::cust(format!(
        "TRIM(name, ' ' || {chr}(9) || {chr}(10) || {chr}(13)) <> ''"
    ))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::migrated_db;
    use crate::seeds;
    use sea_orm::{ActiveModelTrait, IntoActiveModel};

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn test_list_matches_fallback_filter() {
        let db = migrated_db().await;
        seeds::seed_database(&db).await.unwrap();
        let repo = TenantRepository::new(&db);
        let tenants = seeds::tenants();

        let mut query = TenantQuery::new(100);
        query.search = "Pizza".to_string();
        let remote = repo.list(&query).await.unwrap();
        let local = crate::directory::filter_fallback(&tenants, &query);

        assert_eq!(remote.total, 1);
        assert_eq!(remote.total, local.total);
        assert_eq!(remote.items[0].name, "Pizza Hut");

        let query = TenantQuery {
            floor: Some("l1".to_string()),
            category_id: Some(seeds::CATEGORY_FASHION),
            ..TenantQuery::new(100)
        };
        let remote = repo.list(&query).await.unwrap();
        let local = crate::directory::filter_fallback(&tenants, &query);
        let remote_ids: Vec<_> = remote.items.iter().map(|t| t.id).collect();
        let local_ids: Vec<_> = local.items.iter().map(|t| t.id).collect();
        assert_eq!(remote_ids, local_ids);
    }

    #[tokio::test]
    async fn test_list_agrees_with_fallback_on_padding_and_accents() {
        let db = migrated_db().await;
        seeds::seed_database(&db).await.unwrap();
        let mut tenants = seeds::tenants();
        for (id, name) in [(900, "\t\n "), (901, "Émile Café"), (902, "émile Bakery")] {
            let added = tenant::Model {
                id,
                name: name.to_string(),
                brand_name: None,
                category_id: Some(seeds::CATEGORY_FOOD),
                floor: Some("G".to_string()),
                logo_url: None,
                is_featured: false,
                is_new: false,
                description: None,
                operating_hours: None,
                is_active: true,
            };
            added.clone().into_active_model().insert(&db).await.unwrap();
            tenants.push(added);
        }
        let repo = TenantRepository::new(&db);

        for search in ["", "ÉMILE", "émile", "CAFÉ"] {
            let query = TenantQuery {
                search: search.to_string(),
                ..TenantQuery::new(100)
            };
            let remote = repo.list(&query).await.unwrap();
            let local = crate::directory::filter_fallback(&tenants, &query);
            let remote_ids: Vec<_> = remote.items.iter().map(|t| t.id).collect();
            let local_ids: Vec<_> = local.items.iter().map(|t| t.id).collect();

            assert_eq!(remote.total, local.total, "search {search:?}");
            assert_eq!(remote_ids, local_ids, "search {search:?}");
            assert!(!remote_ids.contains(&900));
        }
    }

    #[tokio::test]
    async fn test_list_pages() {
        let db = migrated_db().await;
        seeds::seed_database(&db).await.unwrap();
        let repo = TenantRepository::new(&db);

        let first = repo.list(&TenantQuery::new(3)).await.unwrap();
        assert_eq!(first.items.len(), 3);
        assert!(first.has_more());
        assert!(first.items[0].is_featured);

        let last_page = first.total.div_ceil(3);
        let last = repo
            .list(&TenantQuery {
                page: last_page,
                ..TenantQuery::new(3)
            })
            .await
            .unwrap();
        assert!(!last.has_more());
    }

    #[tokio::test]
    async fn test_categories_sorted() {
        let db = migrated_db().await;
        seeds::seed_database(&db).await.unwrap();

        let categories = TenantRepository::new(&db).categories().await.unwrap();

        assert!(!categories.is_empty());
        assert!(
            categories
                .windows(2)
                .all(|pair| pair[0].sort_order <= pair[1].sort_order)
        );
    }

    #[tokio::test]
    async fn test_list_fails_without_schema() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let result = TenantRepository::new(&db).list(&TenantQuery::new(12)).await;
        assert!(result.is_err());
    }
}
