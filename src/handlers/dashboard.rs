//! # Dashboard API Handler
//!
//! One read endpoint that aggregates everything the company dashboard shows:
//! the company, its preferred card, a page of transactions and a spending
//! summary computed over the full history of the scope.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dashboard::{load_dashboard, DashboardData};
use crate::error::ApiError;
use crate::models::card::Model as CardModel;
use crate::models::company::Model as CompanyModel;
use crate::models::transaction::Model as TransactionModel;
use crate::server::AppState;

const DEFAULT_PAGE_SIZE: u64 = 10;

/// Pagination parameters for the dashboard's transaction page
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardParams {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 10, capped by configuration)
    pub page_size: Option<u64>,
}

/// Spending summary for the dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct SpendingSummaryDto {
    pub currency: String,
    pub limit: Option<Decimal>,
    /// Sum of completed purchases over the full scope history, not just the
    /// returned page
    pub spent: Decimal,
    pub remaining: Option<Decimal>,
}

/// One page of transactions with paging metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionPageDto {
    pub items: Vec<TransactionModel>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Aggregated dashboard response
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDto {
    pub company: CompanyModel,
    /// First active card across the company's accounts, else the first card
    pub card: Option<CardModel>,
    pub transactions: TransactionPageDto,
    pub spending: SpendingSummaryDto,
}

impl From<DashboardData> for DashboardDto {
    fn from(data: DashboardData) -> Self {
        Self {
            company: data.company,
            card: data.card,
            transactions: TransactionPageDto {
                items: data.transactions.items,
                total: data.transactions.total,
                page: data.page,
                page_size: data.page_size,
            },
            spending: SpendingSummaryDto {
                currency: data.spending.currency,
                limit: data.spending.limit,
                spent: data.spending.spent,
                remaining: data.spending.remaining,
            },
        }
    }
}

/// Load the dashboard for a company
#[utoipa::path(
    get,
    path = "/api/companies/{id}/dashboard",
    params(
        ("id" = Uuid, Path, description = "Company UUID"),
        DashboardParams
    ),
    responses(
        (status = 200, description = "Aggregated dashboard", body = DashboardDto),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardDto>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, state.config.dashboard_max_page_size);

    let data = load_dashboard(&state.db, id, page, page_size)
        .await
        .map_err(|e| ApiError::from_repository(e, "Company", &state.config.profile))?;

    Ok(Json(data.into()))
}
