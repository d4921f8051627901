//! Repository contract tests over an in-memory database.
//!
//! These exercise the typed create/read/update/delete outcomes directly,
//! without going through the HTTP layer.

mod test_utils;

use cardlend::error::RepositoryError;
use cardlend::models::account::AccountType;
use cardlend::models::card::CardStatus;
use cardlend::models::loan::LoanStatus;
use cardlend::models::transaction::{TransactionStatus, TransactionType};
use cardlend::repositories::account::CreateAccountRequest;
use cardlend::repositories::card::UpdateCardRequest;
use cardlend::repositories::company::{CreateCompanyRequest, UpdateCompanyRequest};
use cardlend::repositories::loan::CreateLoanRequest;
use cardlend::repositories::transaction::CreateTransactionRequest;
use cardlend::repositories::user::CreateUserRequest;
use cardlend::repositories::{
    AccountRepository, CardRepository, CompanyRepository, LoanRepository, TransactionRepository,
    UserRepository,
};
use rust_decimal::Decimal;
use test_utils::{create_test_account, create_test_card, create_test_company, setup_test_db};
use uuid::Uuid;

#[tokio::test]
async fn test_create_then_get_roundtrip() {
    let db = setup_test_db().await.unwrap();
    let repo = CompanyRepository::new(&db);

    let created = repo
        .create(CreateCompanyRequest {
            name: "Acme AB".to_string(),
            tax_id: Some("556000-0001".to_string()),
            country_code: Some("SE".to_string()),
            business_type: Some("AB".to_string()),
            address: Some(serde_json::json!({ "city": "Stockholm" })),
            credit_limit: Some(Decimal::new(10_000, 0)),
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();

    assert_eq!(created, fetched);
    assert_eq!(fetched.name, "Acme AB");
    assert_eq!(fetched.credit_limit, Some(Decimal::new(10_000, 0)));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let db = setup_test_db().await.unwrap();
    let repo = CompanyRepository::new(&db);
    let company = create_test_company(&db, "Short Lived AB", None).await.unwrap();

    repo.delete(company.id).await.unwrap();

    let result = repo.get_by_id(company.id).await;
    assert!(matches!(
        result,
        Err(RepositoryError::NotFound { entity: "Company" })
    ));
}

#[tokio::test]
async fn test_duplicate_email_fails_and_persists_nothing() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let repo = UserRepository::new(&db);

    repo.create(CreateUserRequest {
        company_id: company.id,
        email: "finance@acme.se".to_string(),
        password_hash: "x".to_string(),
    })
    .await
    .unwrap();

    let result = repo
        .create(CreateUserRequest {
            company_id: company.id,
            email: "finance@acme.se".to_string(),
            password_hash: "y".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Unique { ref field }) if field == "email"
    ));

    // The conflicting insert must not have left a second row behind
    let users = repo.list_by_company(company.id).await.unwrap();
    let matching: Vec<_> = users
        .iter()
        .filter(|u| u.email == "finance@acme.se")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].password_hash, "x");
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();

    let result = UserRepository::new(&db)
        .create(CreateUserRequest {
            company_id: company.id,
            email: "not-an-email".to_string(),
            password_hash: "x".to_string(),
        })
        .await;

    assert!(matches!(result, Err(RepositoryError::Validation { .. })));
}

#[tokio::test]
async fn test_account_defaults() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();

    let account = AccountRepository::new(&db)
        .create(CreateAccountRequest {
            company_id: company.id,
            account_type: AccountType::Checking,
            balance: None,
            currency: None,
        })
        .await
        .unwrap();

    assert_eq!(account.balance, Decimal::ZERO);
    assert_eq!(account.currency, "SEK");
}

#[tokio::test]
async fn test_account_with_dangling_company_is_a_reference_violation() {
    let db = setup_test_db().await.unwrap();

    let result = AccountRepository::new(&db)
        .create(CreateAccountRequest {
            company_id: Uuid::new_v4(),
            account_type: AccountType::Checking,
            balance: None,
            currency: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Reference { ref field }) if field == "company_id"
    ));
}

#[tokio::test]
async fn test_loan_outstanding_balance_defaults_to_principal() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();

    let loan = LoanRepository::new(&db)
        .create(CreateLoanRequest {
            company_id: company.id,
            principal: Decimal::new(50_000, 0),
            interest_rate: Decimal::new(95, 1),
            term_months: 24,
            outstanding_balance: None,
            status: LoanStatus::PendingApproval,
            approver_id: None,
        })
        .await
        .unwrap();

    assert_eq!(loan.outstanding_balance, loan.principal);
    assert_eq!(loan.outstanding_balance, Decimal::new(50_000, 0));
}

#[tokio::test]
async fn test_loan_approver_must_exist() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();

    let result = LoanRepository::new(&db)
        .create(CreateLoanRequest {
            company_id: company.id,
            principal: Decimal::new(1_000, 0),
            interest_rate: Decimal::new(5, 0),
            term_months: 12,
            outstanding_balance: None,
            status: LoanStatus::PendingApproval,
            approver_id: Some(Uuid::new_v4()),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Reference { ref field }) if field == "approver_id"
    ));
}

#[tokio::test]
async fn test_transaction_requires_an_owner() {
    let db = setup_test_db().await.unwrap();

    let result = TransactionRepository::new(&db)
        .create(CreateTransactionRequest {
            account_id: None,
            card_id: None,
            loan_id: None,
            amount: Decimal::new(100, 0),
            transaction_type: TransactionType::Fee,
            currency: None,
            merchant_name: None,
            timestamp: None,
            status: TransactionStatus::Pending,
        })
        .await;

    assert!(matches!(result, Err(RepositoryError::Validation { .. })));
}

#[tokio::test]
async fn test_card_update_cannot_touch_pan_token() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let account = create_test_account(&db, company.id).await.unwrap();
    let card = create_test_card(&db, account.id, "tok-1", CardStatus::Active, None)
        .await
        .unwrap();

    // The update surface has no slot for pan_token, expiry or cvv_hash;
    // the mutable subset goes through and everything else stays put.
    let updated = CardRepository::new(&db)
        .update(
            card.id,
            UpdateCardRequest {
                spending_limit: Some(Decimal::new(5_000, 0)),
                status: Some(CardStatus::Blocked),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.pan_token, "tok-1");
    assert_eq!(updated.expiry, card.expiry);
    assert_eq!(updated.cvv_hash, card.cvv_hash);
    assert_eq!(updated.spending_limit, Some(Decimal::new(5_000, 0)));
    assert_eq!(updated.status, CardStatus::Blocked);
}

#[tokio::test]
async fn test_duplicate_pan_token_is_a_uniqueness_violation() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let account = create_test_account(&db, company.id).await.unwrap();
    create_test_card(&db, account.id, "tok-1", CardStatus::Active, None)
        .await
        .unwrap();

    let result = create_test_card(&db, account.id, "tok-1", CardStatus::Active, None).await;

    let err = result.unwrap_err();
    let repo_err = err.downcast::<RepositoryError>().unwrap();
    assert!(matches!(
        repo_err,
        RepositoryError::Unique { ref field } if field == "pan_token"
    ));
}

#[tokio::test]
async fn test_partial_update_leaves_absent_fields_unchanged() {
    let db = setup_test_db().await.unwrap();
    let repo = CompanyRepository::new(&db);
    let company = create_test_company(&db, "Old Name AB", Some(Decimal::new(1_000, 0)))
        .await
        .unwrap();

    let updated = repo
        .update(
            company.id,
            UpdateCompanyRequest {
                name: Some("New Name AB".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "New Name AB");
    assert_eq!(updated.country_code, company.country_code);
    assert_eq!(updated.credit_limit, Some(Decimal::new(1_000, 0)));
    assert_eq!(updated.created_at, company.created_at);
}

#[tokio::test]
async fn test_deleting_company_with_accounts_is_restricted() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    create_test_account(&db, company.id).await.unwrap();

    let result = CompanyRepository::new(&db).delete(company.id).await;

    assert!(matches!(result, Err(RepositoryError::Reference { .. })));

    // The company must still be there afterwards
    assert!(CompanyRepository::new(&db)
        .get_by_id(company.id)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_transaction_status_is_the_only_mutable_field() {
    let db = setup_test_db().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let account = create_test_account(&db, company.id).await.unwrap();
    let repo = TransactionRepository::new(&db);

    let tx = repo
        .create(CreateTransactionRequest {
            account_id: Some(account.id),
            card_id: None,
            loan_id: None,
            amount: Decimal::new(1_500, 0),
            transaction_type: TransactionType::Purchase,
            currency: None,
            merchant_name: Some("Office Supplies AB".to_string()),
            timestamp: None,
            status: TransactionStatus::Pending,
        })
        .await
        .unwrap();

    assert_eq!(tx.currency, "SEK");

    let updated = repo
        .update_status(tx.id, TransactionStatus::Completed)
        .await
        .unwrap();

    assert_eq!(updated.status, TransactionStatus::Completed);
    assert_eq!(updated.amount, tx.amount);
    assert_eq!(updated.transaction_type, tx.transaction_type);
    assert_eq!(updated.timestamp, tx.timestamp);
}

#[tokio::test]
async fn test_list_by_parent_scopes_to_the_parent() {
    let db = setup_test_db().await.unwrap();
    let acme = create_test_company(&db, "Acme AB", None).await.unwrap();
    let other = create_test_company(&db, "Other AB", None).await.unwrap();
    create_test_account(&db, acme.id).await.unwrap();
    create_test_account(&db, acme.id).await.unwrap();
    create_test_account(&db, other.id).await.unwrap();

    let repo = AccountRepository::new(&db);
    assert_eq!(repo.list_by_company(acme.id).await.unwrap().len(), 2);
    assert_eq!(repo.list_by_company(other.id).await.unwrap().len(), 1);
    assert_eq!(repo.list_by_company(Uuid::new_v4()).await.unwrap().len(), 0);
    assert_eq!(repo.list_all().await.unwrap().len(), 3);
}
