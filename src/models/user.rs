//! User entity model
//!
//! A user always belongs to a company and may additionally appear as the
//! approver on loans. The password hash is opaque to this service.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = User)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Company this user belongs to
    pub company_id: Uuid,

    /// Login email (unique across the dataset)
    pub email: String,

    /// Opaque password hash; never a raw password
    pub password_hash: String,

    /// Timestamp of the user's last login
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_login: Option<DateTimeWithTimeZone>,

    /// Timestamp when the user was created
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(has_many = "super::loan::Entity")]
    ApprovedLoans,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
