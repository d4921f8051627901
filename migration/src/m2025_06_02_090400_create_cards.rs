//! Migration to create the cards table.
//!
//! Cards never store the raw PAN or CVV; only the token and the hash land in
//! the database, and the pan_token is unique across the whole dataset.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cards::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Cards::PanToken).text().not_null())
                    .col(ColumnDef::new(Cards::LastFourDigits).text().not_null())
                    .col(ColumnDef::new(Cards::Expiry).date().not_null())
                    .col(ColumnDef::new(Cards::CvvHash).text().not_null())
                    .col(ColumnDef::new(Cards::SpendingLimit).decimal().null())
                    .col(ColumnDef::new(Cards::Status).text().not_null())
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_account_id")
                            .from(Cards::Table, Cards::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_pan_token")
                    .table(Cards::Table)
                    .col(Cards::PanToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_account_id")
                    .table(Cards::Table)
                    .col(Cards::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_cards_pan_token").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_cards_account_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
    AccountId,
    PanToken,
    LastFourDigits,
    Expiry,
    CvvHash,
    SpendingLimit,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}
