//! Centralized error handling.
//!
//! Every failure the service can surface carries a stable message string,
//! a taxonomy [`ErrorKind`] and an HTTP status. Responses use the same
//! `{ success, message }` envelope as successful calls.

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input
    Validation,
    /// Missing, invalid or expired identity
    Unauthenticated,
    /// Valid identity, insufficient privilege
    Forbidden,
    /// Referenced entity absent
    NotFound,
    /// Duplicate rating, duplicate name, already processed submission
    BusinessRule,
    /// Too many requests for a rate tier
    RateLimited,
    /// Persistence or configuration failure
    ServerFault,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Identity & access
    #[error("No token, authorization denied")]
    Unauthorized,

    #[error("Token is invalid, please try to login again")]
    InvalidToken,

    #[error("The user is not an admin")]
    Forbidden,

    // Login
    #[error("Please input your username or email")]
    MissingIdentifier,

    #[error("The user does not exist")]
    UnknownUser,

    #[error("The password is wrong")]
    WrongPassword,

    #[error("This user was banned by admin")]
    UserBanned,

    // Rating ledger
    #[error("Invalid {0} format")]
    InvalidReference(&'static str),

    #[error("This teacher does not exists")]
    TeacherNotFound,

    #[error("The rating for this teacher is not allowed")]
    TeacherInactive,

    #[error("The rating must be a number from 1 to 5")]
    InvalidScore,

    #[error("The user had already rated this teacher")]
    DuplicateRating,

    #[error("The comment is too short")]
    CommentTooShort,

    #[error("The comment is too long")]
    CommentTooLong,

    // Moderation
    #[error("教师姓名必填")]
    InvalidName,

    #[error("该教师已在系统中")]
    DuplicateName,

    #[error("该投稿已处理")]
    AlreadyProcessed,

    // Generic
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    TooManyRequests {
        message: &'static str,
        retry_after: u64,
    },

    // Server faults
    #[error("Server error during authentication")]
    ServerMisconfigured,

    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl AppError {
    /// Taxonomy category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::MissingIdentifier
            | AppError::UnknownUser
            | AppError::WrongPassword
            | AppError::UserBanned => ErrorKind::Unauthenticated,
            AppError::Forbidden | AppError::TeacherInactive => ErrorKind::Forbidden,
            AppError::InvalidReference(_)
            | AppError::InvalidScore
            | AppError::CommentTooShort
            | AppError::CommentTooLong
            | AppError::InvalidName
            | AppError::Validation(_) => ErrorKind::Validation,
            AppError::TeacherNotFound | AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateRating
            | AppError::DuplicateName
            | AppError::AlreadyProcessed
            | AppError::Conflict(_) => ErrorKind::BusinessRule,
            AppError::TooManyRequests { .. } => ErrorKind::RateLimited,
            AppError::ServerMisconfigured | AppError::Database(_) | AppError::Internal(_) => {
                ErrorKind::ServerFault
            }
        }
    }

    /// Get HTTP status code
    ///
    /// Rating validation and duplicate failures answer 401 for compatibility
    /// with existing clients.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::MissingIdentifier
            | AppError::UnknownUser
            | AppError::WrongPassword
            | AppError::UserBanned
            | AppError::InvalidScore
            | AppError::DuplicateRating
            | AppError::CommentTooShort
            | AppError::CommentTooLong => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::TeacherInactive => StatusCode::FORBIDDEN,
            AppError::TeacherNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidReference(_)
            | AppError::InvalidName
            | AppError::DuplicateName
            | AppError::AlreadyProcessed
            | AppError::Conflict(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServerMisconfigured | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::ServerMisconfigured => {
                tracing::error!("Identity service used without a signing secret");
                self.to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Server error".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether a database error is a unique constraint violation.
    pub fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    /// Whether a database error is a foreign key violation.
    pub fn is_foreign_key_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            AppError::TooManyRequests { retry_after, .. } => Some(*retry_after),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, message: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(message))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
