//! # Account Repository
//!
//! CRUD operations for Account entities. Balance defaults to zero and the
//! currency to SEK when omitted at creation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::account::{
    self, AccountType, ActiveModel as AccountActiveModel, Entity as Account, Model as AccountModel,
};
use crate::models::company::Entity as Company;
use crate::repositories::check_currency;

pub const DEFAULT_CURRENCY: &str = "SEK";

/// Fields accepted when creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub company_id: Uuid,
    pub account_type: AccountType,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
}

/// Partial update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountRequest {
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
}

impl UpdateAccountRequest {
    fn is_empty(&self) -> bool {
        self.account_type.is_none() && self.balance.is_none() && self.currency.is_none()
    }
}

/// Repository for Account database operations
pub struct AccountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new account under an existing company
    pub async fn create(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountModel, RepositoryError> {
        let mut violations = Vec::new();
        if let Some(ref currency) = request.currency {
            check_currency(currency, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        self.ensure_company_exists(request.company_id).await?;

        let account = AccountActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(request.company_id),
            account_type: Set(request.account_type),
            balance: Set(request.balance.unwrap_or(Decimal::ZERO)),
            currency: Set(request
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            created_at: Set(Utc::now().into()),
        };

        account
            .insert(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &["company_id"]))
    }

    /// Get an account by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<AccountModel, RepositoryError> {
        Account::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound { entity: "Account" })
    }

    /// List all accounts (unordered)
    pub async fn list_all(&self) -> Result<Vec<AccountModel>, RepositoryError> {
        Ok(Account::find().all(self.db).await?)
    }

    /// List the accounts belonging to a company
    pub async fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<AccountModel>, RepositoryError> {
        Ok(Account::find()
            .filter(account::Column::CompanyId.eq(company_id))
            .all(self.db)
            .await?)
    }

    /// Apply a partial update to an account
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAccountRequest,
    ) -> Result<AccountModel, RepositoryError> {
        let found = self.get_by_id(id).await?;

        // An all-absent payload is a no-op, not an error
        if request.is_empty() {
            return Ok(found);
        }

        let mut violations = Vec::new();
        if let Some(ref currency) = request.currency {
            check_currency(currency, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        let mut active = found.into_active_model();
        if let Some(account_type) = request.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(balance) = request.balance {
            active.balance = Set(balance);
        }
        if let Some(currency) = request.currency {
            active.currency = Set(currency);
        }

        active
            .update(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &[]))
    }

    /// Hard-delete an account; fails while cards or transactions reference it
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
}
