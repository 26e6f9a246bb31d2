//! Creates the tenant directory tables: categories and tenants.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TenantCategories::Name).text().not_null())
                    .col(
                        ColumnDef::new(TenantCategories::DisplayName)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TenantCategories::Icon).text().null())
                    .col(
                        ColumnDef::new(TenantCategories::TenantCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TenantCategories::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tenants::Name).text().not_null())
                    .col(ColumnDef::new(Tenants::BrandName).text().null())
                    .col(ColumnDef::new(Tenants::CategoryId).integer().null())
                    .col(ColumnDef::new(Tenants::Floor).text().null())
                    .col(ColumnDef::new(Tenants::LogoUrl).text().null())
                    .col(
                        ColumnDef::new(Tenants::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tenants::IsNew)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tenants::Description).text().null())
                    .col(ColumnDef::new(Tenants::OperatingHours).json().null())
                    .col(
                        ColumnDef::new(Tenants::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenants_category")
                            .from(Tenants::Table, Tenants::CategoryId)
                            .to(TenantCategories::Table, TenantCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_category_id")
                    .table(Tenants::Table)
                    .col(Tenants::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TenantCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TenantCategories {
    Table,
    Id,
    Name,
    DisplayName,
    Icon,
    TenantCount,
    SortOrder,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    BrandName,
    CategoryId,
    Floor,
    LogoUrl,
    IsFeatured,
    IsNew,
    Description,
    OperatingHours,
    IsActive,
}
