//! # Loan Repository
//!
//! CRUD operations for Loan entities. The outstanding balance starts out
//! equal to the principal when not supplied explicitly.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::company::Entity as Company;
use crate::models::loan::{
    self, ActiveModel as LoanActiveModel, Entity as Loan, LoanStatus, Model as LoanModel,
};
use crate::models::user::Entity as User;
use crate::repositories::{check_non_negative, check_positive_amount, check_positive_int};

/// Fields accepted when creating a loan.
#[derive(Debug, Clone)]
pub struct CreateLoanRequest {
    pub company_id: Uuid,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub term_months: i32,
    pub outstanding_balance: Option<Decimal>,
    pub status: LoanStatus,
    pub approver_id: Option<Uuid>,
}

/// Partial update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLoanRequest {
    pub principal: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub term_months: Option<i32>,
    pub outstanding_balance: Option<Decimal>,
    pub status: Option<LoanStatus>,
    pub approver_id: Option<Uuid>,
}

impl UpdateLoanRequest {
    fn is_empty(&self) -> bool {
        self.principal.is_none()
            && self.interest_rate.is_none()
            && self.term_months.is_none()
            && self.outstanding_balance.is_none()
            && self.status.is_none()
            && self.approver_id.is_none()
    }
}

/// Repository for Loan database operations
pub struct LoanRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LoanRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new loan under an existing company
    pub async fn create(&self, request: CreateLoanRequest) -> Result<LoanModel, RepositoryError> {
        let mut violations = Vec::new();
        check_positive_amount("principal", request.principal, &mut violations);
        check_positive_int("term_months", request.term_months, &mut violations);
        if let Some(balance) = request.outstanding_balance {
            check_non_negative("outstanding_balance", balance, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        self.ensure_company_exists(request.company_id).await?;
        if let Some(approver_id) = request.approver_id {
            self.ensure_approver_exists(approver_id).await?;
        }

        let loan = LoanActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(request.company_id),
            principal: Set(request.principal),
            interest_rate: Set(request.interest_rate),
            term_months: Set(request.term_months),
            // A fresh loan is owed in full until repayments land
            outstanding_balance: Set(request.outstanding_balance.unwrap_or(request.principal)),
            status: Set(request.status),
            approver_id: Set(request.approver_id),
            created_at: Set(Utc::now().into()),
        };

        loan.insert(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &["company_id", "approver_id"]))
    }

    /// Get a loan by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<LoanModel, RepositoryError> {
        Loan::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound { entity: "Loan" })
    }

    /// List all loans (unordered)
    pub async fn list_all(&self) -> Result<Vec<LoanModel>, RepositoryError> {
        Ok(Loan::find().all(self.db).await?)
    }

    /// List the loans belonging to a company
    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<LoanModel>, RepositoryError> {
        Ok(Loan::find()
            .filter(loan::Column::CompanyId.eq(company_id))
            .all(self.db)
            .await?)
    }

    /// Apply a partial update to a loan
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateLoanRequest,
    ) -> Result<LoanModel, RepositoryError> {
        let found = self.get_by_id(id).await?;

        // An all-absent payload is a no-op, not an error
        if request.is_empty() {
            return Ok(found);
        }

        let mut violations = Vec::new();
        if let Some(principal) = request.principal {
            check_positive_amount("principal", principal, &mut violations);
        }
        if let Some(term_months) = request.term_months {
            check_positive_int("term_months", term_months, &mut violations);
        }
        if let Some(balance) = request.outstanding_balance {
            check_non_negative("outstanding_balance", balance, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        if let Some(approver_id) = request.approver_id {
            self.ensure_approver_exists(approver_id).await?;
        }

        let mut active = found.into_active_model();
        if let Some(principal) = request.principal {
            active.principal = Set(principal);
        }
        if let Some(interest_rate) = request.interest_rate {
            active.interest_rate = Set(interest_rate);
        }
        if let Some(term_months) = request.term_months {
            active.term_months = Set(term_months);
        }
        if let Some(balance) = request.outstanding_balance {
            active.outstanding_balance = Set(balance);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(approver_id) = request.approver_id {
            active.approver_id = Set(Some(approver_id));
        }

        active
            .update(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &["approver_id"]))
    }

    /// Hard-delete a loan; fails while transactions reference it
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let found = self.get_by_id(id).await?;

        found
            .delete(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &["id"]))?;

        Ok(())
    }

    async fn ensure_company_exists(&self, company_id: Uuid) -> Result<(), RepositoryError> {
        let exists = Company::find_by_id(company_id)
            .one(self.db)
            .await?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::reference("company_id"))
        }
    }

    async fn ensure_approver_exists(&self, approver_id: Uuid) -> Result<(), RepositoryError> {
        let exists = User::find_by_id(approver_id).one(self.db).await?.is_some();

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::reference("approver_id"))
        }
    }
}
