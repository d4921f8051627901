//! Dashboard aggregation tests: card choice, scoping, pagination and the
//! history-wide spending summary.

mod test_utils;

use axum::http::StatusCode;
use cardlend::models::card::CardStatus;
use cardlend::models::loan::LoanStatus;
use cardlend::models::transaction::{TransactionStatus, TransactionType};
use cardlend::repositories::loan::CreateLoanRequest;
use cardlend::repositories::transaction::CreateTransactionRequest;
use cardlend::repositories::{LoanRepository, TransactionRepository};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::json;
use test_utils::{
    create_test_account, create_test_card, create_test_company, send_request, setup_test_app,
};
use uuid::Uuid;

async fn insert_card_transaction(
    db: &DatabaseConnection,
    card_id: Uuid,
    account_id: Uuid,
    amount: i64,
    tx_type: TransactionType,
    status: TransactionStatus,
) {
    TransactionRepository::new(db)
        .create(CreateTransactionRequest {
            account_id: Some(account_id),
            card_id: Some(card_id),
            loan_id: None,
            amount: Decimal::new(amount, 0),
            transaction_type: tx_type,
            currency: None,
            merchant_name: Some("Office Supplies AB".to_string()),
            timestamp: None,
            status,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dashboard_unknown_company_is_404() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}/dashboard", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Company not found");
}

#[tokio::test]
async fn test_dashboard_prefers_active_card_across_accounts() {
    let (db, app) = setup_test_app().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let first = create_test_account(&db, company.id).await.unwrap();
    let second = create_test_account(&db, company.id).await.unwrap();

    create_test_card(&db, first.id, "tok-blocked", CardStatus::Blocked, None)
        .await
        .unwrap();
    let active = create_test_card(
        &db,
        second.id,
        "tok-active",
        CardStatus::Active,
        Some(Decimal::new(10_000, 0)),
    )
    .await
    .unwrap();

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}/dashboard", company.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card"]["id"], active.id.to_string());
    assert_eq!(body["card"]["status"], "ACTIVE");
}

#[tokio::test]
async fn test_dashboard_spending_summary_covers_full_history() {
    let (db, app) = setup_test_app().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let account = create_test_account(&db, company.id).await.unwrap();
    let card = create_test_card(
        &db,
        account.id,
        "tok-1",
        CardStatus::Active,
        Some(Decimal::new(10_000, 0)),
    )
    .await
    .unwrap();

    // Three completed purchases, one pending purchase, one completed fee.
    // Only the completed purchases count: 1500 + 899 + 2201 = 4600.
    for (amount, tx_type, status) in [
        (1_500, TransactionType::Purchase, TransactionStatus::Completed),
        (899, TransactionType::Purchase, TransactionStatus::Completed),
        (2_201, TransactionType::Purchase, TransactionStatus::Completed),
        (10_000, TransactionType::Purchase, TransactionStatus::Pending),
        (300, TransactionType::Fee, TransactionStatus::Completed),
    ] {
        insert_card_transaction(&db, card.id, account.id, amount, tx_type, status).await;
    }

    // page_size=2 returns a 2-row window, yet the summary spans all rows
    let (status, body) = send_request(
        &app,
        "GET",
        &format!(
            "/api/companies/{}/dashboard?page=1&page_size=2",
            company.id
        ),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["transactions"]["total"], 5);
    assert_eq!(body["transactions"]["page"], 1);
    assert_eq!(body["transactions"]["page_size"], 2);

    assert_eq!(body["spending"]["limit"], "10000");
    assert_eq!(body["spending"]["spent"], "4600");
    assert_eq!(body["spending"]["remaining"], "5400");
    assert_eq!(body["spending"]["currency"], "SEK");
}

#[tokio::test]
async fn test_dashboard_remaining_clamps_at_zero() {
    let (db, app) = setup_test_app().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();
    let account = create_test_account(&db, company.id).await.unwrap();
    let card = create_test_card(
        &db,
        account.id,
        "tok-1",
        CardStatus::Active,
        Some(Decimal::new(1_000, 0)),
    )
    .await
    .unwrap();

    insert_card_transaction(
        &db,
        card.id,
        account.id,
        2_500,
        TransactionType::Purchase,
        TransactionStatus::Completed,
    )
    .await;

    let (_, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}/dashboard", company.id),
        None,
    )
    .await;

    assert_eq!(body["spending"]["spent"], "2500");
    assert_eq!(body["spending"]["remaining"], "0");
}

#[tokio::test]
async fn test_dashboard_without_cards_uses_company_wide_scope() {
    let (db, app) = setup_test_app().await.unwrap();
    let company = create_test_company(&db, "Acme AB", Some(Decimal::new(20_000, 0)))
        .await
        .unwrap();
    let account = create_test_account(&db, company.id).await.unwrap();

    let loan = LoanRepository::new(&db)
        .create(CreateLoanRequest {
            company_id: company.id,
            principal: Decimal::new(5_000, 0),
            interest_rate: Decimal::new(7, 0),
            term_months: 12,
            outstanding_balance: None,
            status: LoanStatus::Active,
            approver_id: None,
        })
        .await
        .unwrap();

    let tx_repo = TransactionRepository::new(&db);
    tx_repo
        .create(CreateTransactionRequest {
            account_id: None,
            card_id: None,
            loan_id: Some(loan.id),
            amount: Decimal::new(5_000, 0),
            transaction_type: TransactionType::LoanDisbursement,
            currency: None,
            merchant_name: None,
            timestamp: None,
            status: TransactionStatus::Completed,
        })
        .await
        .unwrap();
    tx_repo
        .create(CreateTransactionRequest {
            account_id: Some(account.id),
            card_id: None,
            loan_id: None,
            amount: Decimal::new(700, 0),
            transaction_type: TransactionType::Purchase,
            currency: None,
            merchant_name: None,
            timestamp: None,
            status: TransactionStatus::Completed,
        })
        .await
        .unwrap();

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}/dashboard", company.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card"], serde_json::Value::Null);
    // Both the loan disbursement and the account purchase are in scope
    assert_eq!(body["transactions"]["total"], 2);
    // With no card, the company credit limit applies
    assert_eq!(body["spending"]["limit"], "20000");
    assert_eq!(body["spending"]["spent"], "700");
    assert_eq!(body["spending"]["remaining"], "19300");
}

#[tokio::test]
async fn test_dashboard_with_no_accounts_is_still_usable() {
    let (db, app) = setup_test_app().await.unwrap();
    let company = create_test_company(&db, "Fresh AB", None).await.unwrap();

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}/dashboard", company.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "Fresh AB");
    assert_eq!(body["card"], serde_json::Value::Null);
    assert_eq!(body["transactions"]["items"], json!([]));
    assert_eq!(body["transactions"]["total"], 0);
    assert_eq!(body["spending"]["spent"], "0");
    assert_eq!(body["spending"]["limit"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_dashboard_page_size_is_capped() {
    let (db, app) = setup_test_app().await.unwrap();
    let company = create_test_company(&db, "Acme AB", None).await.unwrap();

    // An absurd page_size must be clamped to the configured maximum, not
    // rejected and not honored
    let (status, body) = send_request(
        &app,
        "GET",
        &format!(
            "/api/companies/{}/dashboard?page_size=100000",
            company.id
        ),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"]["page_size"], 100);
}
