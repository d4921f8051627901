//! # Company Repository
//!
//! CRUD operations for Company entities. Companies are the root of the data
//! model, so deletion is the interesting path: any remaining user, account or
//! loan blocks it (restrict-on-delete).

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::company::{
    ActiveModel as CompanyActiveModel, Entity as Company, Model as CompanyModel,
};
use crate::repositories::{check_country_code, check_non_empty, check_non_negative};

/// Fields accepted when creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub tax_id: Option<String>,
    pub country_code: Option<String>,
    pub business_type: Option<String>,
    pub address: Option<JsonValue>,
    pub credit_limit: Option<Decimal>,
}

/// Partial update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub country_code: Option<String>,
    pub business_type: Option<String>,
    pub address: Option<JsonValue>,
    pub credit_limit: Option<Decimal>,
}

impl UpdateCompanyRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.tax_id.is_none()
            && self.country_code.is_none()
            && self.business_type.is_none()
            && self.address.is_none()
            && self.credit_limit.is_none()
    }
}

/// Repository for Company database operations
pub struct CompanyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new company
    pub async fn create(
        &self,
        request: CreateCompanyRequest,
    ) -> Result<CompanyModel, RepositoryError> {
        let mut violations = Vec::new();
        check_non_empty("name", &request.name, &mut violations);
        if let Some(ref code) = request.country_code {
            check_country_code(code, &mut violations);
        }
        if let Some(limit) = request.credit_limit {
            check_non_negative("credit_limit", limit, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        let company = CompanyActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            tax_id: Set(request.tax_id),
            country_code: Set(request.country_code),
            business_type: Set(request.business_type),
            address: Set(request.address),
            credit_limit: Set(request.credit_limit),
            created_at: Set(Utc::now().into()),
        };

        company
            .insert(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &["tax_id"], &[]))
    }

    /// Get a company by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<CompanyModel, RepositoryError> {
        Company::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound { entity: "Company" })
    }

    /// List all companies (unordered)
    pub async fn list_all(&self) -> Result<Vec<CompanyModel>, RepositoryError> {
        Ok(Company::find().all(self.db).await?)
    }

    /// Apply a partial update to a company
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCompanyRequest,
    ) -> Result<CompanyModel, RepositoryError> {
        let company = self.get_by_id(id).await?;

        // An all-absent payload is a no-op, not an error
        if request.is_empty() {
            return Ok(company);
        }

        let mut violations = Vec::new();
        if let Some(ref name) = request.name {
            check_non_empty("name", name, &mut violations);
        }
        if let Some(ref code) = request.country_code {
            check_country_code(code, &mut violations);
        }
        if let Some(limit) = request.credit_limit {
            check_non_negative("credit_limit", limit, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        let mut active = company.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(tax_id) = request.tax_id {
            active.tax_id = Set(Some(tax_id));
        }
        if let Some(code) = request.country_code {
            active.country_code = Set(Some(code));
        }
        if let Some(business_type) = request.business_type {
            active.business_type = Set(Some(business_type));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(limit) = request.credit_limit {
            active.credit_limit = Set(Some(limit));
        }

        active
            .update(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &["tax_id"], &[]))
    }

    /// Hard-delete a company; fails while dependent rows exist
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let company = self.get_by_id(id).await?;

        company
            .delete(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &["id"]))?;

        Ok(())
    }
}
