//! Transaction entity model
//!
//! A transaction references at least one of an account, a card or a loan.
//! Monetary fields are write-once; only `status` may change after creation.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Transaction)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Account this transaction posted against, if any
    pub account_id: Option<Uuid>,

    /// Card this transaction was made with, if any
    pub card_id: Option<Uuid>,

    /// Loan this transaction services, if any
    pub loan_id: Option<Uuid>,

    /// Transaction amount
    pub amount: Decimal,

    /// Kind of transaction
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// ISO 4217 currency code
    pub currency: String,

    /// Merchant name, for purchases
    pub merchant_name: Option<String>,

    /// When the transaction occurred
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTimeWithTimeZone,

    /// Settlement status
    pub status: TransactionStatus,
}

/// Kind of transaction
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[sea_orm(string_value = "PURCHASE")]
    Purchase,
    #[sea_orm(string_value = "FEE")]
    Fee,
    #[sea_orm(string_value = "LOAN_DISBURSEMENT")]
    LoanDisbursement,
    #[sea_orm(string_value = "PAYMENT")]
    Payment,
}

/// Settlement status of a transaction
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id"
    )]
    Card,
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::Id"
    )]
    Loan,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
