//! # Transaction API Handlers
//!
//! Transactions expose create, read and a status-only update. There is no
//! delete route: the ledger is append-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{missing_fields_error, AppJson};
use crate::models::transaction::{Model as TransactionModel, TransactionStatus, TransactionType};
use crate::repositories::transaction::CreateTransactionRequest;
use crate::repositories::TransactionRepository;
use crate::server::AppState;

/// Request payload for creating a transaction
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionDto {
    pub account_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub loan_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Defaults to "SEK" when omitted
    pub currency: Option<String>,
    pub merchant_name: Option<String>,
    /// Defaults to the creation time when omitted
    #[schema(value_type = Option<String>, format = DateTime)]
    pub timestamp: Option<DateTimeWithTimeZone>,
    pub status: Option<TransactionStatus>,
}

/// Status-only update payload; every other transaction field is write-once
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTransactionDto {
    pub status: Option<TransactionStatus>,
}

/// Create a new transaction
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionModel),
        (status = 400, description = "Validation failed or referenced record missing", body = ApiError)
    ),
    tag = "transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTransactionDto>,
) -> Result<(StatusCode, Json<TransactionModel>), ApiError> {
    let mut missing = Vec::new();
    if request.amount.is_none() {
        missing.push("amount");
    }
    if request.transaction_type.is_none() {
        missing.push("type");
    }
    if request.status.is_none() {
        missing.push("status");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let tx = TransactionRepository::new(&state.db)
        .create(CreateTransactionRequest {
            account_id: request.account_id,
            card_id: request.card_id,
            loan_id: request.loan_id,
            amount: request.amount.unwrap(),
            transaction_type: request.transaction_type.unwrap(),
            currency: request.currency,
            merchant_name: request.merchant_name,
            timestamp: request.timestamp,
            status: request.status.unwrap(),
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// List all transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    responses((status = 200, description = "All transactions", body = [TransactionModel])),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionModel>>, ApiError> {
    let transactions = TransactionRepository::new(&state.db)
        .list_all()
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok(Json(transactions))
}

/// Get a transaction by ID
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(("id" = Uuid, Path, description = "Transaction UUID")),
    responses(
        (status = 200, description = "The transaction", body = TransactionModel),
        (status = 404, description = "Transaction not found", body = ApiError)
    ),
    tag = "transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionModel>, ApiError> {
    let tx = TransactionRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok(Json(tx))
}

/// Update a transaction's settlement status
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    params(("id" = Uuid, Path, description = "Transaction UUID")),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Updated transaction", body = TransactionModel),
        (status = 400, description = "Status missing from payload", body = ApiError),
        (status = 404, description = "Transaction not found", body = ApiError)
    ),
    tag = "transactions"
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateTransactionDto>,
) -> Result<Json<TransactionModel>, ApiError> {
    let Some(status) = request.status else {
        return Err(missing_fields_error(vec!["status"]));
    };

    let tx = TransactionRepository::new(&state.db)
        .update_status(id, status)
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok(Json(tx))
}

/// List the transactions posted against an account
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/transactions",
    params(("id" = Uuid, Path, description = "Account UUID")),
    responses(
        (status = 200, description = "Transactions of the account", body = [TransactionModel])
    ),
    tag = "transactions"
)]
pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransactionModel>>, ApiError> {
    let transactions = TransactionRepository::new(&state.db)
        .list_by_account(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok(Json(transactions))
}

/// List the transactions made with a card
#[utoipa::path(
    get,
    path = "/api/cards/{id}/transactions",
    params(("id" = Uuid, Path, description = "Card UUID")),
    responses(
        (status = 200, description = "Transactions of the card", body = [TransactionModel])
    ),
    tag = "transactions"
)]
pub async fn list_card_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransactionModel>>, ApiError> {
    let transactions = TransactionRepository::new(&state.db)
        .list_by_card(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok(Json(transactions))
}

/// List the transactions servicing a loan
#[utoipa::path(
    get,
    path = "/api/loans/{id}/transactions",
    params(("id" = Uuid, Path, description = "Loan UUID")),
    responses(
        (status = 200, description = "Transactions of the loan", body = [TransactionModel])
    ),
    tag = "transactions"
)]
pub async fn list_loan_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransactionModel>>, ApiError> {
    let transactions = TransactionRepository::new(&state.db)
        .list_by_loan(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Transaction", &state.config.profile))?;

    Ok(Json(transactions))
}
