//! # Card API Handlers
//!
//! The update endpoint only forwards `spending_limit` and `status`; any
//! other field in the payload is dropped before it can reach storage, so a
//! client attempting to rewrite `pan_token` gets back the card unchanged.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use sea_orm::prelude::Date;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{missing_fields_error, AppJson};
use crate::models::card::{CardStatus, Model as CardModel};
use crate::repositories::card::{CreateCardRequest, UpdateCardRequest};
use crate::repositories::CardRepository;
use crate::server::AppState;

/// Request payload for creating a card
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCardDto {
    pub account_id: Option<Uuid>,
    /// Tokenized card number; never the raw PAN
    pub pan_token: Option<String>,
    #[schema(example = "1234")]
    pub last_four_digits: Option<String>,
    pub expiry: Option<Date>,
    /// Hashed CVV; never the raw value
    pub cvv_hash: Option<String>,
    pub spending_limit: Option<Decimal>,
    pub status: Option<CardStatus>,
}

/// Request payload for updating a card. Only the mutable subset is accepted;
/// unknown fields are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCardDto {
    pub spending_limit: Option<Decimal>,
    pub status: Option<CardStatus>,
}

/// Create a new card
#[utoipa::path(
    post,
    path = "/api/cards",
    request_body = CreateCardDto,
    responses(
        (status = 201, description = "Card created", body = CardModel),
        (status = 400, description = "Validation failed or account missing", body = ApiError),
        (status = 409, description = "pan_token already in use", body = ApiError)
    ),
    tag = "cards"
)]
pub async fn create_card(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCardDto>,
) -> Result<(StatusCode, Json<CardModel>), ApiError> {
    let mut missing = Vec::new();
    if request.account_id.is_none() {
        missing.push("account_id");
    }
    if request.pan_token.is_none() {
        missing.push("pan_token");
    }
    if request.last_four_digits.is_none() {
        missing.push("last_four_digits");
    }
    if request.expiry.is_none() {
        missing.push("expiry");
    }
    if request.cvv_hash.is_none() {
        missing.push("cvv_hash");
    }
    if request.status.is_none() {
        missing.push("status");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let card = CardRepository::new(&state.db)
        .create(CreateCardRequest {
            account_id: request.account_id.unwrap(),
            pan_token: request.pan_token.unwrap(),
            last_four_digits: request.last_four_digits.unwrap(),
            expiry: request.expiry.unwrap(),
            cvv_hash: request.cvv_hash.unwrap(),
            spending_limit: request.spending_limit,
            status: request.status.unwrap(),
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "Card", &state.config.profile))?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// List all cards
#[utoipa::path(
    get,
    path = "/api/cards",
    responses((status = 200, description = "All cards", body = [CardModel])),
    tag = "cards"
)]
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<CardModel>>, ApiError> {
    let cards = CardRepository::new(&state.db)
        .list_all()
        .await
        .map_err(|e| ApiError::from_repository(e, "Card", &state.config.profile))?;

    Ok(Json(cards))
}

/// Get a card by ID
#[utoipa::path(
    get,
    path = "/api/cards/{id}",
    params(("id" = Uuid, Path, description = "Card UUID")),
    responses(
        (status = 200, description = "The card", body = CardModel),
        (status = 404, description = "Card not found", body = ApiError)
    ),
    tag = "cards"
)]
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardModel>, ApiError> {
    let card = CardRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Card", &state.config.profile))?;

    Ok(Json(card))
}

/// Update the mutable subset of a card
#[utoipa::path(
    put,
    path = "/api/cards/{id}",
    params(("id" = Uuid, Path, description = "Card UUID")),
    request_body = UpdateCardDto,
    responses(
        (status = 200, description = "Updated card", body = CardModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Card not found", body = ApiError)
    ),
    tag = "cards"
)]
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateCardDto>,
) -> Result<Json<CardModel>, ApiError> {
    let card = CardRepository::new(&state.db)
        .update(
            id,
            UpdateCardRequest {
                spending_limit: request.spending_limit,
                status: request.status,
            },
        )
        .await
        .map_err(|e| ApiError::from_repository(e, "Card", &state.config.profile))?;

    Ok(Json(card))
}

/// Delete a card
#[utoipa::path(
    delete,
    path = "/api/cards/{id}",
    params(("id" = Uuid, Path, description = "Card UUID")),
    responses(
        (status = 204, description = "Card deleted"),
        (status = 404, description = "Card not found", body = ApiError),
        (status = 409, description = "Card still has transactions", body = ApiError)
    ),
    tag = "cards"
)]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    CardRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository_delete(e, "Card", &state.config.profile))?;

    Ok(StatusCode::NO_CONTENT)
}
