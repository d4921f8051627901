//! Migration to create the loans table.
//!
//! A loan optionally references the user who approved it; the reference is
//! restrict-on-delete like every other foreign key in the schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Loans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Loans::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Loans::Principal).decimal().not_null())
                    .col(ColumnDef::new(Loans::InterestRate).decimal().not_null())
                    .col(ColumnDef::new(Loans::TermMonths).integer().not_null())
                    .col(
                        ColumnDef::new(Loans::OutstandingBalance)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Loans::Status).text().not_null())
                    .col(ColumnDef::new(Loans::ApproverId).uuid().null())
                    .col(
                        ColumnDef::new(Loans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loans_company_id")
                            .from(Loans::Table, Loans::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loans_approver_id")
                            .from(Loans::Table, Loans::ApproverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_loans_company_id")
                    .table(Loans::Table)
                    .col(Loans::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_loans_company_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Loans {
    Table,
    Id,
    CompanyId,
    Principal,
    InterestRate,
    TermMonths,
    OutstandingBalance,
    Status,
    ApproverId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
