//! # Transaction Repository
//!
//! Create/read/status-update operations for Transaction entities. Every
//! transaction must name at least one owner (account, card or loan); money
//! and type fields are write-once, so the update surface is `status` alone,
//! and transactions are never deleted.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::account::Entity as Account;
use crate::models::card::Entity as Card;
use crate::models::loan::Entity as Loan;
use crate::models::transaction::{
    self, ActiveModel as TransactionActiveModel, Entity as Transaction, Model as TransactionModel,
    TransactionStatus, TransactionType,
};
use crate::repositories::{check_currency, violation};

/// Fields accepted when creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionRequest {
    pub account_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub loan_id: Option<Uuid>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub currency: Option<String>,
    pub merchant_name: Option<String>,
    pub timestamp: Option<DateTimeWithTimeZone>,
    pub status: TransactionStatus,
}

/// Owner scope for filtered transaction reads. An empty filter matches
/// nothing, never everything.
#[derive(Debug, Clone, Default)]
pub struct OwnerFilter {
    pub account_ids: Vec<Uuid>,
    pub card_ids: Vec<Uuid>,
    pub loan_ids: Vec<Uuid>,
}

impl OwnerFilter {
    pub fn for_card(card_id: Uuid) -> Self {
        Self {
            card_ids: vec![card_id],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.account_ids.is_empty() && self.card_ids.is_empty() && self.loan_ids.is_empty()
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::any();
        if !self.account_ids.is_empty() {
            condition =
                condition.add(transaction::Column::AccountId.is_in(self.account_ids.clone()));
        }
        if !self.card_ids.is_empty() {
            condition = condition.add(transaction::Column::CardId.is_in(self.card_ids.clone()));
        }
        if !self.loan_ids.is_empty() {
            condition = condition.add(transaction::Column::LoanId.is_in(self.loan_ids.clone()));
        }
        condition
    }
}

/// One page of transactions plus the total row count for the scope.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub items: Vec<TransactionModel>,
    pub total: u64,
}

/// Repository for Transaction database operations
pub struct TransactionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new transaction against at least one existing owner
    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<TransactionModel, RepositoryError> {
        let mut violations = Vec::new();
        if request.account_id.is_none() && request.card_id.is_none() && request.loan_id.is_none() {
            violations.push(violation(
                "account_id",
                "at least one of account_id, card_id or loan_id must be provided",
            ));
        }
        if let Some(ref currency) = request.currency {
            check_currency(currency, &mut violations);
        }
        if !violations.is_empty() {
            return Err(RepositoryError::validations(violations));
        }

        if let Some(account_id) = request.account_id {
            let exists = Account::find_by_id(account_id).one(self.db).await?.is_some();
            if !exists {
                return Err(RepositoryError::reference("account_id"));
            }
        }
        if let Some(card_id) = request.card_id {
            let exists = Card::find_by_id(card_id).one(self.db).await?.is_some();
            if !exists {
                return Err(RepositoryError::reference("card_id"));
            }
        }
        if let Some(loan_id) = request.loan_id {
            let exists = Loan::find_by_id(loan_id).one(self.db).await?.is_some();
            if !exists {
                return Err(RepositoryError::reference("loan_id"));
            }
        }

        let tx = TransactionActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(request.account_id),
            card_id: Set(request.card_id),
            loan_id: Set(request.loan_id),
            amount: Set(request.amount),
            transaction_type: Set(request.transaction_type),
            currency: Set(request
                .currency
                .unwrap_or_else(|| super::account::DEFAULT_CURRENCY.to_string())),
            merchant_name: Set(request.merchant_name),
            timestamp: Set(request.timestamp.unwrap_or_else(|| Utc::now().into())),
            status: Set(request.status),
        };

        tx.insert(self.db).await.map_err(|e| {
            RepositoryError::from_write_error(e, &[], &["account_id", "card_id", "loan_id"])
        })
    }

    /// Get a transaction by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<TransactionModel, RepositoryError> {
        Transaction::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: "Transaction",
            })
    }

    /// List all transactions (unordered)
    pub async fn list_all(&self) -> Result<Vec<TransactionModel>, RepositoryError> {
        Ok(Transaction::find().all(self.db).await?)
    }

    /// List the transactions posted against an account
    pub async fn list_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<TransactionModel>, RepositoryError> {
        Ok(Transaction::find()
            .filter(transaction::Column::AccountId.eq(account_id))
            .all(self.db)
            .await?)
    }

    /// List the transactions made with a card
    pub async fn list_by_card(
        &self,
        card_id: Uuid,
    ) -> Result<Vec<TransactionModel>, RepositoryError> {
        Ok(Transaction::find()
            .filter(transaction::Column::CardId.eq(card_id))
            .all(self.db)
            .await?)
    }

    /// List the transactions servicing a loan
    pub async fn list_by_loan(
        &self,
        loan_id: Uuid,
    ) -> Result<Vec<TransactionModel>, RepositoryError> {
        Ok(Transaction::find()
            .filter(transaction::Column::LoanId.eq(loan_id))
            .all(self.db)
            .await?)
    }

    /// Fetch one page of transactions for an owner scope, newest first.
    /// `page` is 1-based; `page_size` must be positive.
    pub async fn page_for_owners(
        &self,
        filter: &OwnerFilter,
        page: u64,
        page_size: u64,
    ) -> Result<TransactionPage, RepositoryError> {
        if filter.is_empty() {
            return Ok(TransactionPage {
                items: Vec::new(),
                total: 0,
            });
        }

        let paginator = Transaction::find()
            .filter(filter.condition())
            .order_by_desc(transaction::Column::Timestamp)
            .order_by_desc(transaction::Column::Id)
            .paginate(self.db, page_size.max(1));

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(TransactionPage { items, total })
    }

    /// Sum of completed purchase amounts across the whole owner scope.
    ///
    /// This intentionally reads the full filtered history, not a page: the
    /// spending summary must not understate spend for scopes with more
    /// transactions than one page holds.
    pub async fn completed_purchase_total(
        &self,
        filter: &OwnerFilter,
    ) -> Result<Decimal, RepositoryError> {
        if filter.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let rows = Transaction::find()
            .filter(filter.condition())
            .filter(transaction::Column::Status.eq(TransactionStatus::Completed))
            .filter(transaction::Column::TransactionType.eq(TransactionType::Purchase))
            .all(self.db)
            .await?;

        Ok(rows.iter().map(|tx| tx.amount).sum())
    }

    /// Replace the settlement status of a transaction; the only mutation the
    /// entity supports
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> Result<TransactionModel, RepositoryError> {
        let found = self.get_by_id(id).await?;

        let mut active = found.into_active_model();
        active.status = Set(status);

        active
            .update(self.db)
            .await
            .map_err(|e| RepositoryError::from_write_error(e, &[], &[]))
    }
}
