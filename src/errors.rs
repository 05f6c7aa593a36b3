//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Why a bearer token was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is missing")]
    Missing,

    #[error("Token has expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed")]
    Malformed,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    DataConflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    // Accounts
    #[error("{0}")]
    InvalidEmail(String),

    #[error("{0}")]
    InvalidPassword(String),

    #[error("User does not exist")]
    UserNotFound,

    #[error("{0}")]
    UserAlreadyExists(String),

    // Authentication & Authorization
    #[error("No such staff account")]
    NotAdmin,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Payload too large")]
    PayloadTooLarge,

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::DataConflict(_) => "DATA_CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidEmail(_) => "INVALID_EMAIL",
            AppError::InvalidPassword(_) => "INVALID_PASSWORD",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            AppError::NotAdmin => "NOT_ADMIN",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Token(TokenError::Missing) => "TOKEN_MISSING",
            AppError::Token(TokenError::Expired) => "TOKEN_EXPIRED",
            AppError::Token(TokenError::InvalidSignature) => "TOKEN_INVALID_SIGNATURE",
            AppError::Token(TokenError::Malformed) => "TOKEN_MALFORMED",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_)
            | AppError::DataConflict(_)
            | AppError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::InvalidPassword(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidEmail(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UserNotFound
            | AppError::Unauthorized
            | AppError::InvalidCredentials
            | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::NotAdmin | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, what: impl FnOnce() -> String) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, what: impl FnOnce() -> String) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(what()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        AppError::AlreadyExists(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::DataConflict(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::already_exists("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidEmail("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::NotAdmin.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Token(TokenError::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_errors_have_distinct_codes() {
        let codes = [
            AppError::Token(TokenError::Missing).code(),
            AppError::Token(TokenError::Expired).code(),
            AppError::Token(TokenError::InvalidSignature).code(),
            AppError::Token(TokenError::Malformed).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("disk on fire");
        assert_eq!(err.user_message(), "An internal error occurred");
    }
}
