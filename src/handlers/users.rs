//! # User API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{missing_fields_error, AppJson};
use crate::models::user::Model as UserModel;
use crate::repositories::user::{CreateUserRequest, UpdateUserRequest};
use crate::repositories::UserRepository;
use crate::server::AppState;

/// Request payload for creating a user
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserDto {
    pub company_id: Option<Uuid>,
    #[schema(example = "finance@acme.se")]
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Request payload for updating a user; absent fields stay unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_login: Option<DateTimeWithTimeZone>,
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserModel),
        (status = 400, description = "Validation failed or company missing", body = ApiError),
        (status = 409, description = "Email already in use", body = ApiError)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserModel>), ApiError> {
    let mut missing = Vec::new();
    if request.company_id.is_none() {
        missing.push("company_id");
    }
    if request.email.is_none() {
        missing.push("email");
    }
    if request.password_hash.is_none() {
        missing.push("password_hash");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let user = UserRepository::new(&state.db)
        .create(CreateUserRequest {
            company_id: request.company_id.unwrap(),
            email: request.email.unwrap(),
            password_hash: request.password_hash.unwrap(),
        })
        .await
        .map_err(|e| ApiError::from_repository(e, "User", &state.config.profile))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = [UserModel])),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserModel>>, ApiError> {
    let users = UserRepository::new(&state.db)
        .list_all()
        .await
        .map_err(|e| ApiError::from_repository(e, "User", &state.config.profile))?;

    Ok(Json(users))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "The user", body = UserModel),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserModel>, ApiError> {
    let user = UserRepository::new(&state.db)
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(e, "User", &state.config.profile))?;

    Ok(Json(user))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserModel),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
        (status = 409, description = "Email already in use", body = ApiError)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateUserDto>,
) -> Result<Json<UserModel>, ApiError> {
    let user = UserRepository::new(&state.db)
        .update(
            id,
            UpdateUserRequest {
                email: request.email,
                password_hash: request.password_hash,
                last_login: request.last_login,
            },
        )
        .await
        .map_err(|e| ApiError::from_repository(e, "User", &state.config.profile))?;

    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ApiError),
        (status = 409, description = "User still approves existing loans", body = ApiError)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    UserRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository_delete(e, "User", &state.config.profile))?;

    Ok(StatusCode::NO_CONTENT)
}
