//! Creates the contacts table receiving contact form submissions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contacts::Name).text().not_null())
                    .col(ColumnDef::new(Contacts::Email).text().not_null())
                    .col(ColumnDef::new(Contacts::Phone).text().null())
                    .col(
                        ColumnDef::new(Contacts::EnquiryType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contacts::EnquiryDetails).text().not_null())
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    Name,
    Email,
    Phone,
    EnquiryType,
    EnquiryDetails,
    CreatedAt,
}
