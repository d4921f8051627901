//! # Error Handling
//!
//! This module provides unified error handling for the Cardlend API: a typed
//! repository-level error taxonomy and a consistent problem+json response
//! format at the HTTP boundary.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

/// A single field-level validation problem.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,
    /// What is wrong with it
    pub problem: String,
}

/// Typed outcomes of repository operations.
///
/// Every storage-level failure is classified into one of these variants
/// before it crosses the repository boundary; raw [`sea_orm::DbErr`] values
/// never reach a handler unclassified.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("validation failed")]
    Validation { violations: Vec<FieldViolation> },

    #[error("unique constraint violated on {field}")]
    Unique { field: String },

    #[error("reference to missing row via {field}")]
    Reference { field: String },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("database error")]
    Database(#[from] sea_orm::DbErr),
}

impl RepositoryError {
    /// Single-field validation failure.
    pub fn validation<F: Into<String>, P: Into<String>>(field: F, problem: P) -> Self {
        Self::Validation {
            violations: vec![FieldViolation {
                field: field.into(),
                problem: problem.into(),
            }],
        }
    }

    /// Validation failure carrying several field problems at once.
    pub fn validations(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    pub fn reference<F: Into<String>>(field: F) -> Self {
        Self::Reference {
            field: field.into(),
        }
    }

    /// Classifies an insert/update error, attributing unique violations to
    /// `unique_fields` (matched against the driver's error message) and
    /// foreign-key violations to `reference_fields`.
    pub fn from_write_error(
        error: sea_orm::DbErr,
        unique_fields: &[&str],
        reference_fields: &[&str],
    ) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation detected");
            let field = match_field(&error, unique_fields);
            return Self::Unique { field };
        }

        if is_foreign_key_violation(&error) {
            tracing::debug!(?error, "Foreign key violation detected");
            let field = match_field(&error, reference_fields);
            return Self::Reference { field };
        }

        Self::Database(error)
    }
}

/// Picks the field a constraint error is about by searching the driver's
/// message for known column names. SQLite reports the full `table.column`
/// pair, Postgres the constraint name; both contain the column.
fn match_field(error: &sea_orm::DbErr, candidates: &[&str]) -> String {
    let message = error.to_string();
    candidates
        .iter()
        .find(|field| message.contains(*field))
        .copied()
        .unwrap_or_else(|| candidates.first().copied().unwrap_or("unknown"))
        .to_string()
}

fn runtime_database_error(
    error: &sea_orm::DbErr,
) -> Option<&dyn sea_orm::sqlx::error::DatabaseError> {
    use sea_orm::RuntimeErr;

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return None,
    };

    runtime_err.as_database_error()
}

pub(crate) fn is_unique_violation(error: &sea_orm::DbErr) -> bool {
    const PG_UNIQUE: &str = "23505";
    const MYSQL_DUPLICATE_CODES: &[&str] = &["1022", "1062", "1169", "1586"];
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let Some(db_error) = runtime_database_error(error) else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    if let Some(code) = db_error.code() {
        let code_str = code.as_ref();
        return code_str == PG_UNIQUE
            || MYSQL_DUPLICATE_CODES.contains(&code_str)
            || SQLITE_DUPLICATE_CODES.contains(&code_str);
    }

    false
}

pub(crate) fn is_foreign_key_violation(error: &sea_orm::DbErr) -> bool {
    const PG_FOREIGN_KEY: &str = "23503";
    const MYSQL_FOREIGN_KEY_CODES: &[&str] = &["1216", "1217", "1451", "1452"];
    const SQLITE_FOREIGN_KEY_CODES: &[&str] = &["787", "1811"];

    let Some(db_error) = runtime_database_error(error) else {
        return false;
    };

    if db_error.is_foreign_key_violation() {
        return true;
    }

    if let Some(code) = db_error.code() {
        let code_str = code.as_ref();
        return code_str == PG_FOREIGN_KEY
            || MYSQL_FOREIGN_KEY_CODES.contains(&code_str)
            || SQLITE_FOREIGN_KEY_CODES.contains(&code_str);
    }

    false
}

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Correlation id for log lookup (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new<C: Into<String>, M: Into<String>>(status: StatusCode, code: C, message: M) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            trace_id: Some(
                format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str(),
            ),
        }
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Maps a repository outcome to its transport representation.
    ///
    /// `entity` names the resource for logging context. Internal detail is
    /// attached for every profile except `production`.
    pub fn from_repository(error: RepositoryError, entity: &'static str, profile: &str) -> Self {
        match error {
            RepositoryError::Validation { violations } => Self::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "One or more fields are invalid",
            )
            .with_details(json!({ "violations": violations })),
            RepositoryError::Unique { field } => Self::new(
                StatusCode::CONFLICT,
                "UNIQUENESS_VIOLATION",
                "A record with these details already exists",
            )
            .with_details(json!({ "fields": [field] })),
            RepositoryError::Reference { field } => Self::new(
                StatusCode::BAD_REQUEST,
                "REFERENCE_VIOLATION",
                "A referenced record does not exist",
            )
            .with_details(json!({ "field": field })),
            RepositoryError::NotFound { entity: found } => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", found),
            ),
            RepositoryError::Database(db_err) => {
                tracing::error!(entity, error = ?db_err, "Database error");
                let error = Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "An internal error occurred",
                );
                if profile == "production" {
                    error
                } else {
                    error.with_details(json!({ "internal": db_err.to_string() }))
                }
            }
        }
    }

    /// Like [`ApiError::from_repository`], but for delete operations, where a
    /// reference violation means dependent rows still exist: a state conflict
    /// rather than malformed input.
    pub fn from_repository_delete(
        error: RepositoryError,
        entity: &'static str,
        profile: &str,
    ) -> Self {
        match error {
            RepositoryError::Reference { .. } => Self::new(
                StatusCode::CONFLICT,
                "REFERENCE_VIOLATION",
                format!("{} still has dependent records", entity),
            ),
            other => Self::from_repository(other, entity, profile),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        (self.status, headers, axum::Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", error);

        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "An internal error occurred",
        )
    }
}
