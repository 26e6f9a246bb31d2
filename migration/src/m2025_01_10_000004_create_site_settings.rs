//! Creates the site_settings table holding SEO and tracking fragments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteSettings::Key).text().not_null())
                    .col(
                        ColumnDef::new(SiteSettings::InjectionPoint)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteSettings::SettingType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SiteSettings::Value).text().not_null())
                    .col(
                        ColumnDef::new(SiteSettings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SiteSettings::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SiteSettings {
    Table,
    Id,
    Key,
    InjectionPoint,
    SettingType,
    Value,
    IsActive,
    SortOrder,
}
