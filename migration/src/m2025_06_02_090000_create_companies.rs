//! Migration to create the companies table.
//!
//! Companies are the root entity of the data model; users, accounts and loans
//! all hang off a company row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).text().not_null())
                    .col(ColumnDef::new(Companies::TaxId).text().null())
                    .col(ColumnDef::new(Companies::CountryCode).text().null())
                    .col(ColumnDef::new(Companies::BusinessType).text().null())
                    .col(ColumnDef::new(Companies::Address).json_binary().null())
                    .col(
                        ColumnDef::new(Companies::CreditLimit)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // tax_id is nullable-unique: companies without one coexist freely
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_tax_id")
                    .table(Companies::Table)
                    .col(Companies::TaxId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_companies_tax_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    TaxId,
    CountryCode,
    BusinessType,
    Address,
    CreditLimit,
    CreatedAt,
}
