// src/error.rs

//! Error taxonomy for the Arena API.
//!
//! Every failure path in the registration, OTP, and scoring flows maps to
//! one of these kinds. All variants except `Storage` are recoverable by the
//! caller and map to 4xx responses; `Storage` is fatal to the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result type used throughout the domain, services, and repositories.
pub type ApiResult<T> = Result<T, ApiError>;

/// Application error kinds surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Phone number already registered to another user
    #[error("Phone number already registered.")]
    DuplicatePhone,

    /// Email already registered to another user
    #[error("Email already registered.")]
    DuplicateEmail,

    /// No user matches the given id or phone number
    #[error("User not found.")]
    UserNotFound,

    /// No live OTP exists for the user
    #[error("OTP not found for this phone number. Request a new one.")]
    OtpNotFound,

    /// The OTP's expiry instant has passed
    #[error("OTP has expired. Please request a new one.")]
    OtpExpired,

    /// Submitted code does not match the live OTP
    #[error("Invalid OTP.")]
    OtpMismatch,

    /// The user already has 3 score entries today
    #[error("Maximum 3 scores allowed per day.")]
    DailyCapExceeded,

    /// The user has no score entry for the current date
    #[error("No score found for this user today.")]
    NoScoreToday,

    /// The user's entry vanished between lookup and ranking
    #[error("User not found in today's scores.")]
    UserNotRankedToday,

    /// Request body failed boundary validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Infrastructure failure talking to PostgreSQL
    #[error("Storage unavailable.")]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicatePhone
            | ApiError::DuplicateEmail
            | ApiError::OtpExpired
            | ApiError::OtpMismatch
            | ApiError::DailyCapExceeded
            | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound
            | ApiError::OtpNotFound
            | ApiError::NoScoreToday
            | ApiError::UserNotRankedToday => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error at a level matching its severity.
    fn log(&self) {
        match self {
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
            }
            ApiError::OtpMismatch => {
                tracing::warn!("OTP verification attempt with wrong code");
            }
            _ => {
                tracing::debug!(error = %self, "request failed");
            }
        }
    }
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorBody {
            error: self.to_string(),
        };

        (self.status_code(), axum::Json(body)).into_response()
    }
}
