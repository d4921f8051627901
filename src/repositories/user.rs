//! # User Repository
//!
//! CRUD operations for User entities. Email uniqueness is enforced by the
//! storage layer; a duplicate insert is reported deterministically as a
//! uniqueness violation and never overwrites the existing row.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::company::Entity as Company;
use crate::models::user::{self, ActiveModel as UserActiveModel, Entity as User, Model as UserModel};
use crate::repositories::check_email;

/// Fields accepted when creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub company_id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Partial update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub last_login: Option<DateTimeWithTimeZone>,
}

impl UpdateUserRequest {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none() && self.last_login.is_none()
    }
}

/// Repository for User database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new user under an existing company
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserModel, RepositoryError> {
        let mut violations = Vec::new();
        check_email(&request.email, &mut violations);
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        self.ensure_company_exists(request.company_id).await?;

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(request.company_id),
            email: Set(request.email),
            password_hash: Set(request.password_hash),
            last_login: Set(None),
            created_at: Set(Utc::now().into()),
        };

        user.insert(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &["email"], &["company_id"]))
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<UserModel, RepositoryError> {
        User::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound { entity: "User" })
    }

    /// List all users (unordered)
    pub async fn list_all(&self) -> Result<Vec<UserModel>, RepositoryError> {
        Ok(User::find().all(self.db).await?)
    }

    /// List the users belonging to a company
    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<UserModel>, RepositoryError> {
        Ok(User::find()
            .filter(user::Column::CompanyId.eq(company_id))
            .all(self.db)
            .await?)
    }

    /// Apply a partial update to a user
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserModel, RepositoryError> {
        let found = self.get_by_id(id).await?;

        // An all-absent payload is a no-op, not an error
        if request.is_empty() {
            return Ok(found);
        }

        let mut violations = Vec::new();
        if let Some(ref email) = request.email {
            check_email(email, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        let mut active = found.into_active_model();
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = request.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(last_login) = request.last_login {
            active.last_login = Set(Some(last_login));
        }

        active
            .update(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &["email"], &[]))
    }

    /// Hard-delete a user; fails while loans still name them as approver
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
