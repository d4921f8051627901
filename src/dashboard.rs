//! Read-side aggregation behind the company dashboard.
//!
//! The dashboard is a composition of reads with different failure modes: the
//! company fetch is fatal, everything after it degrades. Card reads fan out
//! concurrently per account and one account's failure must not take down the
//! others.

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::account::Model as AccountModel;
use crate::models::card::{CardStatus, Model as CardModel};
use crate::models::company::Model as CompanyModel;
use crate::repositories::account::DEFAULT_CURRENCY;
use crate::repositories::transaction::{OwnerFilter, TransactionPage};
use crate::repositories::{
    AccountRepository, CardRepository, CompanyRepository, LoanRepository, TransactionRepository,
};

/// Spending summary derived from the full transaction history of the scope.
#[derive(Debug, Clone)]
pub struct SpendingSummary {
    /// Currency the summary is denominated in
    pub currency: String,
    /// Applicable limit: the chosen card's spending limit, else the company
    /// credit limit
    pub limit: Option<Decimal>,
    /// Sum of completed purchases across the whole scope history
    pub spent: Decimal,
    /// `max(0, limit - spent)`, when a limit applies
    pub remaining: Option<Decimal>,
}

/// Everything the dashboard needs for one render.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub company: CompanyModel,
    pub card: Option<CardModel>,
    pub transactions: TransactionPage,
    pub page: u64,
    pub page_size: u64,
    pub spending: SpendingSummary,
}

/// Loads the dashboard for a company.
///
/// Fails only when the company itself cannot be loaded; account, card and
/// transaction reads degrade to empty results so a partial storage problem
/// still yields a usable dashboard.
pub async fn load_dashboard(
    db: &DatabaseConnection,
    company_id: Uuid,
    page: u64,
    page_size: u64,
) -> Result<DashboardData, RepositoryError> {
    let company = CompanyRepository::new(db).get_by_id(company_id).await?;

    let accounts = AccountRepository::new(db)
        .list_by_company(company_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(%company_id, error = %e, "Account read failed, degrading to empty");
            Vec::new()
        });

    let cards = fetch_cards_fanned_out(db, &accounts).await;
    let card = choose_card(&cards);

    let scope = match card {
        Some(card) => OwnerFilter::for_card(card.id),
        None => company_scope(db, company_id, &accounts, &cards).await,
    };

    let tx_repo = TransactionRepository::new(db);
    let transactions = tx_repo
        .page_for_owners(&scope, page, page_size)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(%company_id, error = %e, "Transaction read failed, degrading to empty");
            TransactionPage {
                items: Vec::new(),
                total: 0,
            }
        });

    let spent = tx_repo
        .completed_purchase_total(&scope)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(%company_id, error = %e, "Spend total read failed, reporting zero");
            Decimal::ZERO
        });

    let spending = spending_summary(&company, card, &accounts, spent);
    let card = card.cloned();

    Ok(DashboardData {
        company,
        card,
        transactions,
        page,
        page_size,
        spending,
    })
}

/// Issues one card read per account without waiting on each other, then
/// merges in account order. A failed read contributes an empty list.
async fn fetch_cards_fanned_out(
    db: &DatabaseConnection,
    accounts: &[AccountModel],
) -> Vec<CardModel> {
    let handles: Vec<_> = accounts
        .iter()
        .map(|account| {
            let db = db.clone();
            let account_id = account.id;
            tokio::spawn(async move {
                CardRepository::new(&db).list_by_account(account_id).await
            })
        })
        .collect();

    let mut cards = Vec::new();
    for (account, handle) in accounts.iter().zip(handles) {
        match handle.await {
            Ok(Ok(account_cards)) => cards.extend(account_cards),
            Ok(Err(e)) => {
                tracing::warn!(account_id = %account.id, error = %e, "Card read failed for account");
            }
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "Card read task failed");
            }
        }
    }
    cards
}

/// First active card wins; otherwise the first card overall.
fn choose_card(cards: &[CardModel]) -> Option<&CardModel> {
    cards
        .iter()
        .find(|card| card.status == CardStatus::Active)
        .or_else(|| cards.first())
}

/// Company-wide owner scope: every account, card and loan the company owns.
async fn company_scope(
    db: &DatabaseConnection,
    company_id: Uuid,
    accounts: &[AccountModel],
    cards: &[CardModel],
) -> OwnerFilter {
    let loans = LoanRepository::new(db)
        .list_by_company(company_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(%company_id, error = %e, "Loan read failed, degrading to empty");
            Vec::new()
        });

    OwnerFilter {
        account_ids: accounts.iter().map(|a| a.id).collect(),
        card_ids: cards.iter().map(|c| c.id).collect(),
        loan_ids: loans.iter().map(|l| l.id).collect(),
    }
}

fn spending_summary(
    company: &CompanyModel,
    card: Option<&CardModel>,
    accounts: &[AccountModel],
    spent: Decimal,
) -> SpendingSummary {
    let limit = card
        .and_then(|c| c.spending_limit)
        .or(company.credit_limit);
    let remaining = limit.map(|limit| (limit - spent).max(Decimal::ZERO));

    let currency = card
        .and_then(|card| accounts.iter().find(|a| a.id == card.account_id))
        .map(|account| account.currency.clone())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    SpendingSummary {
        currency,
        limit,
        spent,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::AccountType;
    use chrono::Utc;

    fn card(status: CardStatus, limit: Option<Decimal>, account_id: Uuid) -> CardModel {
        CardModel {
            id: Uuid::new_v4(),
            account_id,
            pan_token: format!("tok-{}", Uuid::new_v4()),
            last_four_digits: "1234".to_string(),
            expiry: chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            cvv_hash: "h".to_string(),
            spending_limit: limit,
            status,
            created_at: Utc::now().into(),
        }
    }

    fn company(credit_limit: Option<Decimal>) -> CompanyModel {
        CompanyModel {
            id: Uuid::new_v4(),
            name: "Acme AB".to_string(),
            tax_id: None,
            country_code: None,
            business_type: None,
            address: None,
            credit_limit,
            created_at: Utc::now().into(),
        }
    }

    fn account(id: Uuid, currency: &str) -> AccountModel {
        AccountModel {
            id,
            company_id: Uuid::new_v4(),
            account_type: AccountType::Checking,
            balance: Decimal::ZERO,
            currency: currency.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_choose_card_prefers_active() {
        let account_id = Uuid::new_v4();
        let blocked = card(CardStatus::Blocked, None, account_id);
        let active = card(CardStatus::Active, None, account_id);
        let cards = vec![blocked.clone(), active.clone()];

        assert_eq!(choose_card(&cards).unwrap().id, active.id);
    }

    #[test]
    fn test_choose_card_falls_back_to_first() {
        let account_id = Uuid::new_v4();
        let blocked = card(CardStatus::Blocked, None, account_id);
        let expired = card(CardStatus::Expired, None, account_id);
        let cards = vec![blocked.clone(), expired];

        assert_eq!(choose_card(&cards).unwrap().id, blocked.id);
        assert!(choose_card(&[]).is_none());
    }

    #[test]
    fn test_summary_card_limit_beats_company_limit() {
        let account_id = Uuid::new_v4();
        let accounts = vec![account(account_id, "SEK")];
        let chosen = card(
            CardStatus::Active,
            Some(Decimal::new(10_000, 0)),
            account_id,
        );
        let company = company(Some(Decimal::new(50_000, 0)));

        let summary = spending_summary(
            &company,
            Some(&chosen),
            &accounts,
            Decimal::new(4_600, 0),
        );

        assert_eq!(summary.limit, Some(Decimal::new(10_000, 0)));
        assert_eq!(summary.remaining, Some(Decimal::new(5_400, 0)));
        assert_eq!(summary.currency, "SEK");
    }

    #[test]
    fn test_summary_remaining_clamps_at_zero() {
        let account_id = Uuid::new_v4();
        let accounts = vec![account(account_id, "EUR")];
        let chosen = card(CardStatus::Active, Some(Decimal::new(100, 0)), account_id);

        let summary = spending_summary(
            &company(None),
            Some(&chosen),
            &accounts,
            Decimal::new(250, 0),
        );

        assert_eq!(summary.remaining, Some(Decimal::ZERO));
        assert_eq!(summary.spent, Decimal::new(250, 0));
        assert_eq!(summary.currency, "EUR");
    }

    #[test]
    fn test_summary_without_any_limit() {
        let summary = spending_summary(&company(None), None, &[], Decimal::new(42, 0));

        assert_eq!(summary.limit, None);
        assert_eq!(summary.remaining, None);
        assert_eq!(summary.currency, DEFAULT_CURRENCY);
    }
}
