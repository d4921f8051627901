//! Loan entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Loan entity representing credit extended to a company
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Loan)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Unique identifier for the loan (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Company this loan belongs to
    pub company_id: Uuid,

    /// Amount originally lent
    pub principal: Decimal,

    /// Interest rate applied to the loan
    pub interest_rate: Decimal,

    /// Repayment term in months
    pub term_months: i32,

    /// Amount still owed; starts out equal to the principal
    pub outstanding_balance: Decimal,

    /// Lifecycle status of the loan
    pub status: LoanStatus,

    /// User who approved the loan, once approved
    pub approver_id: Option<Uuid>,

    /// Timestamp when the loan was created
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

/// Loan lifecycle status
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    #[sea_orm(string_value = "PENDING_APPROVAL")]
    PendingApproval,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "DELINQUENT")]
    Delinquent,
    #[sea_orm(string_value = "PAID_OFF")]
    PaidOff,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ApproverId",
        to = "super::user::Column::Id"
    )]
    Approver,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
