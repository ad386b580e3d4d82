//! # API Errors
//!
//! Every handler returns `Result<T, ApiError>`. Domain and storage errors
//! convert with `?`; the response is always a JSON body:
//!
//! ```text
//! HTTP/1.1 409 Conflict
//! {"code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for product 7: available 2, requested 3"}
//! ```
//!
//! ## Status Mapping
//! | Error                         | Status | Code                  |
//! |-------------------------------|--------|-----------------------|
//! | Validation, malformed JSON/id | 400    | `VALIDATION_ERROR`    |
//! | Bad credentials               | 400    | `INVALID_CREDENTIALS` |
//! | No session                    | 401    | `UNAUTHORIZED`        |
//! | Unknown or foreign entity     | 404    | `NOT_FOUND`           |
//! | Stock too low                 | 409    | `INSUFFICIENT_STOCK`  |
//! | Lost a race on a product row  | 409    | `CONCURRENT_CONFLICT` |
//! | Email already registered      | 409    | `DUPLICATE`           |
//! | Row still referenced          | 409    | `CONFLICT`            |
//! | Storage failure               | 500    | `INTERNAL_ERROR`      |

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use confeitaria_core::{CoreError, ValidationError};
use confeitaria_db::{DbError, OrderError};
use serde::Serialize;
use thiserror::Error;

/// Error returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InsufficientStock(String),

    #[error("{0}")]
    ConcurrentConflict(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Conflict(String),

    /// Details are logged, never sent.
    #[error("{0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Login required".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InsufficientStock(_)
            | ApiError::ConcurrentConflict(_)
            | ApiError::Duplicate(_)
            | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            ApiError::ConcurrentConflict(_) => "CONCURRENT_CONFLICT",
            ApiError::Duplicate(_) => "DUPLICATE",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            code: self.code(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => inner.into(),
            CoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::InsufficientStock { .. } => ApiError::InsufficientStock(err.to_string()),
            CoreError::ConcurrentConflict { .. } => ApiError::ConcurrentConflict(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Duplicate(err.to_string()),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::Conflict("Record is still referenced by other records".to_string())
            }
            DbError::Busy(_) => {
                ApiError::ConcurrentConflict("Database is busy, please retry".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Core(core) => core.into(),
            OrderError::Storage(db) => db.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ApiError::Internal(format!("session store: {err}"))
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
