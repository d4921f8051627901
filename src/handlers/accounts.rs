//! # Account API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{missing_fields_error, AppJson};
use crate::models::account::{AccountType, Model as AccountModel};
use crate::models::card::Model as CardModel;
use crate::repositories::account::{CreateAccountRequest, UpdateAccountRequest};
use crate::repositories::{AccountRepository, CardRepository};
use crate::server::AppState;

/// Request payload for creating an account
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountDto {
    pub company_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Defaults to 0 when omitted
    pub balance: Option<Decimal>,
    /// Defaults to "SEK" when omitted
    pub currency: Option<String>,
}

/// Request payload for updating an account; absent fields stay unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAccountDto {
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = CreateAccountDto,
    responses(
        (status = 201, description = "Account created", body = AccountModel),
        (status = 400, description = "Validation failed or company missing", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAccountDto>,
) -> Result<(StatusCode, Json<AccountModel>), ApiError> {
    let mut missing = Vec::new();
    if request.company_id.is_none() {
        missing.push("company_id");
    }
    if request.account_type.is_none() {
        missing.push("type");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let account = AccountRepository::new(&state.db)
        .create(CreateAccountRequest {
            company_id: request.company_id.unwrap(),
            account_type: request.account_type.unwrap(),
            balance: request.balance,
            currency: request.currency,
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "Account", &state.config.profile))?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/accounts",
    responses((status = 200, description = "All accounts", body = [AccountModel])),
    tag = "accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountModel>>, ApiError> {
    let accounts = AccountRepository::new(&state.db)
        .list_all()
        .await
        .map_err(|e| ApiError::from_repository(e, "Account", &state.config.profile))?;

    Ok(Json(accounts))
}

/// Get an account by ID
#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account UUID")),
    responses(
        (status = 200, description = "The account", body = AccountModel),
        (status = 404, description = "Account not found", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountModel>, ApiError> {
    let account = AccountRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Account", &state.config.profile))?;

    Ok(Json(account))
}

/// Update an account
#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account UUID")),
    request_body = UpdateAccountDto,
    responses(
        (status = 200, description = "Updated account", body = AccountModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Account not found", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateAccountDto>,
) -> Result<Json<AccountModel>, ApiError> {
    let account = AccountRepository::new(&state.db)
        .update(
            id,
            UpdateAccountRequest {
                account_type: request.account_type,
                balance: request.balance,
                currency: request.currency,
            },
        )
        .await
        .map_err(|e| ApiError::from_repository(e, "Account", &state.config.profile))?;

    Ok(Json(account))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account UUID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found", body = ApiError),
        (status = 409, description = "Account still has dependent records", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    AccountRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository_delete(e, "Account", &state.config.profile))?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the cards issued on an account
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/cards",
    params(("id" = Uuid, Path, description = "Account UUID")),
    responses(
        (status = 200, description = "Cards of the account", body = [CardModel])
    ),
    tag = "accounts"
)]
pub async fn list_account_cards(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CardModel>>, ApiError> {
    let cards = CardRepository::new(&state.db)
        .list_by_account(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Card", &state.config.profile))?;

    Ok(Json(cards))
}
