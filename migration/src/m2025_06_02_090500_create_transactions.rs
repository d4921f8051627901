//! Migration to create the transactions table.
//!
//! A transaction may hang off an account, a card or a loan; the at-least-one
//! owner rule is enforced by the repository layer, the foreign keys here only
//! guarantee that whichever owners are present actually exist.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::AccountId).uuid().null())
                    .col(ColumnDef::new(Transactions::CardId).uuid().null())
                    .col(ColumnDef::new(Transactions::LoanId).uuid().null())
                    .col(ColumnDef::new(Transactions::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(Transactions::TransactionType)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Currency)
                            .text()
                            .not_null()
                            .default("SEK"),
                    )
                    .col(ColumnDef::new(Transactions::MerchantName).text().null())
                    .col(
                        ColumnDef::new(Transactions::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Transactions::Status).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_card_id")
                            .from(Transactions::Table, Transactions::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_loan_id")
                            .from(Transactions::Table, Transactions::LoanId)
                            .to(Loans::Table, Loans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_transactions_account_id", Transactions::AccountId),
            ("idx_transactions_card_id", Transactions::CardId),
            ("idx_transactions_loan_id", Transactions::LoanId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Transactions::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_transactions_account_id",
            "idx_transactions_card_id",
            "idx_transactions_loan_id",
        ] {
            manager.drop_index(Index::drop().name(name).to_owned()).await?;
        }

        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    CardId,
    LoanId,
    Amount,
    #[sea_orm(iden = "type")]
    TransactionType,
    Currency,
    MerchantName,
    Timestamp,
    Status,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Loans {
    Table,
    Id,
}
