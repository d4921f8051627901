//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Cardlend API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::Json;

use crate::db;
use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;

pub mod accounts;
pub mod cards;
pub mod companies;
pub mod dashboard;
pub mod loans;
pub mod transactions;
pub mod users;

/// JSON extractor whose rejection is rendered as a problem+json 400 instead
/// of axum's default plain-text response.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(ApiError::from(rejection)),
        }
    }
}

/// 400 response for POST bodies missing required fields, checked at the
/// boundary before the repository is reached.
pub(crate) fn missing_fields_error(missing: Vec<&'static str>) -> ApiError {
    ApiError::new(
        axum::http::StatusCode::BAD_REQUEST,
        "VALIDATION_FAILED",
        "Missing required fields",
    )
    .with_details(serde_json::json!({ "fields": missing }))
}

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness endpoint; verifies the database is reachable
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Database unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db::health_check(&state.db).await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
