//! # Loan API Handlers

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
use crate::models::loan::{LoanStatus, Model as LoanModel};
use crate::repositories::loan::{CreateLoanRequest, UpdateLoanRequest};
use crate::repositories::LoanRepository;
use crate::server::AppState;

/// Request payload for creating a loan
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoanDto {
    pub company_id: Option<Uuid>,
    pub principal: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub term_months: Option<i32>,
    /// Defaults to `principal` when omitted
    pub outstanding_balance: Option<Decimal>,
    pub status: Option<LoanStatus>,
    pub approver_id: Option<Uuid>,
}

/// Request payload for updating a loan; absent fields stay unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLoanDto {
    pub principal: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub term_months: Option<i32>,
    pub outstanding_balance: Option<Decimal>,
    pub status: Option<LoanStatus>,
    pub approver_id: Option<Uuid>,
}

/// Create a new loan
#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = CreateLoanDto,
    responses(
        (status = 201, description = "Loan created", body = LoanModel),
        (status = 400, description = "Validation failed or referenced record missing", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn create_loan(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateLoanDto>,
) -> Result<(StatusCode, Json<LoanModel>), ApiError> {
    let mut missing = Vec::new();
    if request.company_id.is_none() {
        missing.push("company_id");
    }
    if request.principal.is_none() {
        missing.push("principal");
    }
    if request.interest_rate.is_none() {
        missing.push("interest_rate");
    }
    if request.term_months.is_none() {
        missing.push("term_months");
    }
    if request.status.is_none() {
        missing.push("status");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let loan = LoanRepository::new(&state.db)
        .create(CreateLoanRequest {
            company_id: request.company_id.unwrap(),
            principal: request.principal.unwrap(),
            interest_rate: request.interest_rate.unwrap(),
            term_months: request.term_months.unwrap(),
            outstanding_balance: request.outstanding_balance,
            status: request.status.unwrap(),
            approver_id: request.approver_id,
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "Loan", &state.config.profile))?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// List all loans
#[utoipa::path(
    get,
    path = "/api/loans",
    responses((status = 200, description = "All loans", body = [LoanModel])),
    tag = "loans"
)]
pub async fn list_loans(State(state): State<AppState>) -> Result<Json<Vec<LoanModel>>, ApiError> {
    let loans = LoanRepository::new(&state.db)
        .list_all()
        .await
        .map_err(|e| ApiError::from_repository(e, "Loan", &state.config.profile))?;

    Ok(Json(loans))
}

/// Get a loan by ID
#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    params(("id" = Uuid, Path, description = "Loan UUID")),
    responses(
        (status = 200, description = "The loan", body = LoanModel),
        (status = 404, description = "Loan not found", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanModel>, ApiError> {
    let loan = LoanRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Loan", &state.config.profile))?;

    Ok(Json(loan))
}

/// Update a loan
#[utoipa::path(
    put,
    path = "/api/loans/{id}",
    params(("id" = Uuid, Path, description = "Loan UUID")),
    request_body = UpdateLoanDto,
    responses(
        (status = 200, description = "Updated loan", body = LoanModel),
        (status = 400, description = "Validation failed or approver missing", body = ApiError),
        (status = 404, description = "Loan not found", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateLoanDto>,
) -> Result<Json<LoanModel>, ApiError> {
    let loan = LoanRepository::new(&state.db)
        .update(
            id,
            UpdateLoanRequest {
                principal: request.principal,
                interest_rate: request.interest_rate,
                term_months: request.term_months,
                outstanding_balance: request.outstanding_balance,
                status: request.status,
                approver_id: request.approver_id,
            },
        )
        .await
        .map_err(|e| ApiError::from_repository(e, "Loan", &state.config.profile))?;

    Ok(Json(loan))
}

/// Delete a loan
#[utoipa::path(
    delete,
    path = "/api/loans/{id}",
    params(("id" = Uuid, Path, description = "Loan UUID")),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found", body = ApiError),
        (status = 409, description = "Loan still has transactions", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    LoanRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository_delete(e, "Loan", &state.config.profile))?;

    Ok(StatusCode::NO_CONTENT)
}
