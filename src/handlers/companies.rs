//! # Company API Handlers
//!
//! CRUD endpoints for companies, plus the nested listings of a company's
//! users, accounts and loans.

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
use crate::models::account::Model as AccountModel;
use crate::models::company::Model as CompanyModel;
use crate::models::loan::Model as LoanModel;
use crate::models::user::Model as UserModel;
use crate::repositories::company::{CreateCompanyRequest, UpdateCompanyRequest};
use crate::repositories::{AccountRepository, CompanyRepository, LoanRepository, UserRepository};
use crate::server::AppState;

/// Request payload for creating a company
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanyDto {
    /// Legal company name (required)
    #[schema(example = "Acme AB")]
    pub name: Option<String>,
    pub tax_id: Option<String>,
    #[schema(example = "SE")]
    pub country_code: Option<String>,
    pub business_type: Option<String>,
    pub address: Option<serde_json::Value>,
    pub credit_limit: Option<Decimal>,
}

/// Request payload for updating a company; absent fields stay unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCompanyDto {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub country_code: Option<String>,
    pub business_type: Option<String>,
    pub address: Option<serde_json::Value>,
    pub credit_limit: Option<Decimal>,
}

/// Create a new company
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyDto,
    responses(
        (status = 201, description = "Company created", body = CompanyModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "tax_id already in use", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCompanyDto>,
) -> Result<(StatusCode, Json<CompanyModel>), ApiError> {
    let Some(name) = request.name else {
        return Err(missing_fields_error(vec!["name"]));
    };

    let company = CompanyRepository::new(&state.db)
        .create(CreateCompanyRequest {
            name,
            tax_id: request.tax_id,
            country_code: request.country_code,
            business_type: request.business_type,
            address: request.address,
            credit_limit: request.credit_limit,
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "Company", &state.config.profile))?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// List all companies
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "All companies", body = [CompanyModel])
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyModel>>, ApiError> {
    let companies = CompanyRepository::new(&state.db)
        .list_all()
        .await
        .map_err(|e| ApiError::from_repository(e, "Company", &state.config.profile))?;

    Ok(Json(companies))
}

/// Get a company by ID
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = Uuid, Path, description = "Company UUID")),
    responses(
        (status = 200, description = "The company", body = CompanyModel),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyModel>, ApiError> {
    let company = CompanyRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Company", &state.config.profile))?;

    Ok(Json(company))
}

/// Update a company
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    params(("id" = Uuid, Path, description = "Company UUID")),
    request_body = UpdateCompanyDto,
    responses(
        (status = 200, description = "Updated company", body = CompanyModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Company not found", body = ApiError),
        (status = 409, description = "tax_id already in use", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateCompanyDto>,
) -> Result<Json<CompanyModel>, ApiError> {
    let company = CompanyRepository::new(&state.db)
        .update(
            id,
            UpdateCompanyRequest {
                name: request.name,
                tax_id: request.tax_id,
                country_code: request.country_code,
                business_type: request.business_type,
                address: request.address,
                credit_limit: request.credit_limit,
            },
        )
        .await
        .map_err(|e| ApiError::from_repository(e, "Company", &state.config.profile))?;

    Ok(Json(company))
}

/// Delete a company
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    params(("id" = Uuid, Path, description = "Company UUID")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found", body = ApiError),
        (status = 409, description = "Company still has dependent records", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    CompanyRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository_delete(e, "Company", &state.config.profile))?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the users of a company
#[utoipa::path(
    get,
    path = "/api/companies/{id}/users",
    params(("id" = Uuid, Path, description = "Company UUID")),
    responses(
        (status = 200, description = "Users of the company", body = [UserModel])
    ),
    tag = "companies"
)]
pub async fn list_company_users(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserModel>>, ApiError> {
    let users = UserRepository::new(&state.db)
        .list_by_company(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "User", &state.config.profile))?;

    Ok(Json(users))
}

/// List the accounts of a company
#[utoipa::path(
    get,
    path = "/api/companies/{id}/accounts",
    params(("id" = Uuid, Path, description = "Company UUID")),
    responses(
        (status = 200, description = "Accounts of the company", body = [AccountModel])
    ),
    tag = "companies"
)]
pub async fn list_company_accounts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AccountModel>>, ApiError> {
    let accounts = AccountRepository::new(&state.db)
        .list_by_company(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Account", &state.config.profile))?;

    Ok(Json(accounts))
}

/// List the loans of a company
#[utoipa::path(
    get,
    path = "/api/companies/{id}/loans",
    params(("id" = Uuid, Path, description = "Company UUID")),
    responses(
        (status = 200, description = "Loans of the company", body = [LoanModel])
    ),
    tag = "companies"
)]
pub async fn list_company_loans(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LoanModel>>, ApiError> {
    let loans = LoanRepository::new(&state.db)
        .list_by_company(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "Loan", &state.config.profile))?;

    Ok(Json(loans))
}
