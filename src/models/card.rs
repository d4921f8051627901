//! Card entity model
//!
//! Only tokenized card data is stored: `pan_token` stands in for the primary
//! account number and `cvv_hash` for the CVV. Neither raw value ever reaches
//! this service, and neither column is updatable after creation.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Card)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Unique identifier for the card (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Account this card draws on
    pub account_id: Uuid,

    /// Tokenized card number (unique across the dataset)
    pub pan_token: String,

    /// Last four digits of the card number, for display
    pub last_four_digits: String,

    /// Expiry date of the card
    pub expiry: Date,

    /// Opaque hash of the CVV
    pub cvv_hash: String,

    /// Per-card spending limit, if any
    pub spending_limit: Option<Decimal>,

    /// Card status
    pub status: CardStatus,

    /// Timestamp when the card was created
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

/// Card status
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "BLOCKED")]
    Blocked,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
