//! # Card Repository
//!
//! CRUD operations for Card entities. The update surface is deliberately
//! narrow: only `spending_limit` and `status` are mutable. The PAN token,
//! expiry and CVV hash are write-once; there is no code path that touches
//! them after creation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::Date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::account::Entity as Account;
use crate::models::card::{
    self, ActiveModel as CardActiveModel, CardStatus, Entity as Card, Model as CardModel,
};
use crate::repositories::{check_last_four, check_non_empty, check_non_negative};

/// Fields accepted when creating a card.
#[derive(Debug, Clone)]
pub struct CreateCardRequest {
    pub account_id: Uuid,
    pub pan_token: String,
    pub last_four_digits: String,
    pub expiry: Date,
    pub cvv_hash: String,
    pub spending_limit: Option<Decimal>,
    pub status: CardStatus,
}

/// Partial update payload, restricted to the mutable subset.
#[derive(Debug, Clone, Default)]
pub struct UpdateCardRequest {
    pub spending_limit: Option<Decimal>,
    pub status: Option<CardStatus>,
}

impl UpdateCardRequest {
    fn is_empty(&self) -> bool {
        self.spending_limit.is_none() && self.status.is_none()
    }
}

/// Repository for Card database operations
pub struct CardRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CardRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new card on an existing account
    pub async fn create(&self, request: CreateCardRequest) -> Result<CardModel, RepositoryError> {
        let mut violations = Vec::new();
        check_non_empty("pan_token", &request.pan_token, &mut violations);
        check_non_empty("cvv_hash", &request.cvv_hash, &mut violations);
        check_last_four(&request.last_four_digits, &mut violations);
        if let Some(limit) = request.spending_limit {
            check_non_negative("spending_limit", limit, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        self.ensure_account_exists(request.account_id).await?;

        let card = CardActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(request.account_id),
            pan_token: Set(request.pan_token),
            last_four_digits: Set(request.last_four_digits),
            expiry: Set(request.expiry),
            cvv_hash: Set(request.cvv_hash),
            spending_limit: Set(request.spending_limit),
            status: Set(request.status),
            created_at: Set(Utc::now().into()),
        };

        card.insert(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &["pan_token"], &["account_id"]))
    }

    /// Get a card by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<CardModel, RepositoryError> {
        Card::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound { entity: "Card" })
    }

    /// List all cards (unordered)
    pub async fn list_all(&self) -> Result<Vec<CardModel>, RepositoryError> {
        Ok(Card::find().all(self.db).await?)
    }

    /// List the cards issued on an account
    pub async fn list_by_account(&self, account_id: Uuid) -> Result<Vec<CardModel>, RepositoryError> {
        Ok(Card::find()
            .filter(card::Column::AccountId.eq(account_id))
            .all(self.db)
            .await?)
    }

    /// Apply a partial update to the mutable subset of a card
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCardRequest,
    ) -> Result<CardModel, RepositoryError> {
        let found = self.get_by_id(id).await?;

        // An all-absent payload is a no-op, not an error. A payload carrying
        // only immutable fields lands here too, leaving the card untouched.
        if request.is_empty() {
            return Ok(found);
        }

        let mut violations = Vec::new();
        if let Some(limit) = request.spending_limit {
            check_non_negative("spending_limit", limit, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        let mut active = found.into_active_model();
        if let Some(limit) = request.spending_limit {
            active.spending_limit = Set(Some(limit));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }

        active
            .update(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &[]))
    }

    /// Hard-delete a card; fails while transactions reference it
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let found = self.get_by_id(id).await?;

        found
            .delete(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &["id"]))?;

        Ok(())
    }

    async fn ensure_account_exists(&self, account_id: Uuid) -> Result<(), RepositoryError> {
        let exists = Account::find_by_id(account_id)
            .one(self.db)
            .await?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::reference("account_id"))
        }
    }
}
