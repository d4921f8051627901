//! Company entity model
//!
//! This module contains the SeaORM entity model for the companies table.
//! Companies are the root of the data model; users, accounts and loans all
//! belong to exactly one company.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Company entity representing a business customer
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Company)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Legal company name
    pub name: String,

    /// Official tax ID or registration number (unique across the dataset)
    pub tax_id: Option<String>,

    /// ISO 3166-1 alpha-2 country code
    pub country_code: Option<String>,

    /// Legal form of the company (AB, LLC, ...)
    pub business_type: Option<String>,

    /// Structured address information
    #[sea_orm(column_type = "JsonBinary")]
    pub address: Option<JsonValue>,

    /// Maximum credit amount available to this company
    pub credit_limit: Option<Decimal>,

    /// Timestamp when the company was created
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
