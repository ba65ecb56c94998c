use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::auth::AuthError;

/// Failures reported by the relational store behind the board.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Project {0} not found")]
    NotFound(Uuid),

    #[error("A project titled {0:?} already exists")]
    DuplicateTitle(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl From<DbErr> for StoreError {
    fn from(e: DbErr) -> Self {
        StoreError::Persistence(e.to_string())
    }
}

/// Failures of a board operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    /// The project is not on the caller's board; nothing was applied.
    #[error("Project {0} is not on this board")]
    UnknownProject(Uuid),

    /// The change was applied locally, the store rejected it, and the local
    /// board was restored.
    #[error("Change rolled back: {0}")]
    RolledBack(StoreError),

    /// The change would leave the project invalid; nothing was applied.
    #[error(transparent)]
    Invalid(ValidationError),

    /// A store call outside a reconciled change failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Payload problems, reported before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Budget must be a non-negative number")]
    NegativeBudget,

    #[error("End date must not be before start date")]
    EndBeforeStart,

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("last4 must be exactly four digits")]
    InvalidLast4,

    #[error("Expiry month must be between 1 and 12")]
    InvalidExpiryMonth,

    #[error("{0}")]
    Malformed(String),
}

/// Error type returned by HTTP handlers.
///
/// Rendered as `{"error": "..."}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Persistence { message: String, rolled_back: bool },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn rolled_back(&self) -> bool {
        matches!(self, ApiError::Persistence { rolled_back: true, .. })
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Persistence { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if self.rolled_back() {
            body["rolled_back"] = serde_json::Value::Bool(true);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        match e {
            DbErr::RecordNotFound(what) => ApiError::NotFound(what),
            e => ApiError::Internal(format!("Database error: {e}")),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::DuplicateTitle(_) => ApiError::Conflict(e.to_string()),
            StoreError::Persistence(_) => ApiError::Persistence {
                message: e.to_string(),
                rolled_back: false,
            },
        }
    }
}

impl From<BoardError> for ApiError {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::UnknownProject(_) => ApiError::NotFound(e.to_string()),
            BoardError::Invalid(inner) => ApiError::Validation(inner),
            BoardError::RolledBack(StoreError::NotFound(_)) => ApiError::NotFound(e.to_string()),
            BoardError::RolledBack(_) => ApiError::Persistence {
                message: e.to_string(),
                rolled_back: true,
            },
            BoardError::Store(inner) => inner.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::KeyUnavailable(msg) => {
                tracing::error!(error = %msg, "Token verification keys unavailable");
                ApiError::Internal("Token verification unavailable".to_string())
            }
            e => ApiError::Unauthenticated(e.to_string()),
        }
    }
}
