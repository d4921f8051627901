//! Test utilities for database and API testing.
//!
//! Tests run against an in-memory SQLite database with all migrations
//! applied. The pool is pinned to a single connection so every query sees
//! the same in-memory database, and foreign keys stay enforced (sqlx turns
//! `PRAGMA foreign_keys` on by default) because the restrict-on-delete
//! semantics are part of the contract under test.

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cardlend::config::AppConfig;
use cardlend::migration::{Migrator, MigratorTrait};
use cardlend::repositories::account::CreateAccountRequest;
use cardlend::repositories::card::CreateCardRequest;
use cardlend::repositories::company::CreateCompanyRequest;
use cardlend::repositories::{AccountRepository, CardRepository, CompanyRepository};
use cardlend::server::{create_app, AppState};
use cardlend::models::account::{AccountType, Model as AccountModel};
use cardlend::models::card::{CardStatus, Model as CardModel};
use cardlend::models::company::Model as CompanyModel;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower::ServiceExt;
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the full application router over a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_test_app() -> Result<(DatabaseConnection, axum::Router)> {
    let db = setup_test_db().await?;
    let config = AppConfig {
        profile: "test".to_string(),
        ..Default::default()
    };

    let state = AppState {
        db: db.clone(),
        config,
    };

    Ok((db, create_app(state)))
}

/// Sends one request through the router and decodes the JSON body (Null for
/// empty bodies).
#[allow(dead_code)]
pub async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            builder.body(Body::from(json.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Inserts a company fixture.
#[allow(dead_code)]
pub async fn create_test_company(
    db: &DatabaseConnection,
    name: &str,
    credit_limit: Option<Decimal>,
) -> Result<CompanyModel> {
    let company = CompanyRepository::new(db)
        .create(CreateCompanyRequest {
            name: name.to_string(),
            tax_id: None,
            country_code: Some("SE".to_string()),
            business_type: None,
            address: None,
            credit_limit,
        })
        .await?;

    Ok(company)
}

/// Inserts a checking-account fixture under a company.
#[allow(dead_code)]
pub async fn create_test_account(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<AccountModel> {
    let account = AccountRepository::new(db)
        .create(CreateAccountRequest {
            company_id,
            account_type: AccountType::Checking,
            balance: None,
            currency: None,
        })
        .await?;

    Ok(account)
}

/// Inserts a card fixture on an account.
#[allow(dead_code)]
pub async fn create_test_card(
    db: &DatabaseConnection,
    account_id: Uuid,
    pan_token: &str,
    status: CardStatus,
    spending_limit: Option<Decimal>,
) -> Result<CardModel> {
    let card = CardRepository::new(db)
        .create(CreateCardRequest {
            account_id,
            pan_token: pan_token.to_string(),
            last_four_digits: "1234".to_string(),
            expiry: chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            cvv_hash: "hashed-cvv".to_string(),
            spending_limit,
            status,
        })
        .await?;

    Ok(card)
}
