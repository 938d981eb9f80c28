//! Centralized error handling.
//!
//! Every fallible path in the crate returns [`AppResult`]. Handlers hand the
//! error straight back to axum, which renders it through [`IntoResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::validation::{FieldErrors, OldInput, ValidationFailure};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    /// Storage-level uniqueness violation that slipped past validation.
    #[error("{0} already exists")]
    Conflict(String),

    /// Field errors for a rejected submission
    #[error("The given data was invalid.")]
    Validation(ValidationFailure),

    /// Request that could not be decoded
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        // The email column carries the only unique index a write can hit.
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::warn!(%detail, "Unique constraint violated");
            return AppError::Conflict("Email".to_string());
        }
        AppError::Database(err)
    }
}

/// JSON error envelope: `{"error": {...}}`
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
    /// Submitted values to refill the form with
    #[serde(skip_serializing_if = "Option::is_none")]
    old: Option<OldInput>,
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn into_body(self) -> ErrorBody {
        let code = self.code();
        match self {
            AppError::Validation(failure) => ErrorBody {
                code,
                message: "The given data was invalid.".to_string(),
                errors: Some(failure.errors),
                old: Some(failure.old_input),
            },
            AppError::BadRequest(msg) => ErrorBody::plain(code, msg),
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                ErrorBody::plain(code, "A database error occurred")
            }
            AppError::Internal(msg) => {
                tracing::error!(%msg, "Internal error");
                ErrorBody::plain(code, "An internal error occurred")
            }
            other => ErrorBody::plain(code, other.to_string()),
        }
    }
}

impl ErrorBody {
    fn plain(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
            old: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = ErrorEnvelope {
            error: self.into_body(),
        };
        (status, Json(envelope)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Turns a missing row into [`AppError::NotFound`].
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>, old_input: OldInput) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        AppError::Validation(ValidationFailure { errors, old_input })
    }
}
