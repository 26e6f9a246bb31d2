//! Creates the promotions table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promotions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promotions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Promotions::TenantId).integer().null())
                    .col(ColumnDef::new(Promotions::Title).text().not_null())
                    .col(ColumnDef::new(Promotions::Description).text().null())
                    .col(ColumnDef::new(Promotions::ImageUrl).text().null())
                    .col(ColumnDef::new(Promotions::StartsOn).date().not_null())
                    .col(ColumnDef::new(Promotions::EndsOn).date().not_null())
                    .col(
                        ColumnDef::new(Promotions::Status)
                            .string_len(16)
                            .not_null()
                            .default("staging"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Promotions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Promotions {
    Table,
    Id,
    TenantId,
    Title,
    Description,
    ImageUrl,
    StartsOn,
    EndsOn,
    Status,
}
