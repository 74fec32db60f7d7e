//! Registration and user lookup handlers.
//!
//! Request-shape validation (name, phone, email format) lives here at the
//! boundary; everything past this point works with well-formed input.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{Metrics, NewUser, User, UserDirectory};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Optional leading `+`, then 6 to 19 digits with common separators.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ()\-]{5,18}$").expect("phone pattern is valid"));

/// Deliberately loose: one `@`, no whitespace, a dot in the domain part.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    // ---
    pub name: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    // ---
    pub user_id: i64,
    pub name: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            phone_number: user.phone_number,
            date_of_birth: user.date_of_birth,
            email: user.email,
            is_verified: user.is_verified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    // ---
    pub users: Vec<UserResponse>,
}

fn validate_registration(req: &RegisterRequest) -> ApiResult<()> {
    // ---
    if req.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("name must not be empty".into()));
    }
    if !PHONE_RE.is_match(&req.phone_number) {
        return Err(ApiError::InvalidRequest(
            "phone_number is not a valid phone number".into(),
        ));
    }
    if !EMAIL_RE.is_match(&req.email) {
        return Err(ApiError::InvalidRequest(
            "email is not a valid email address".into(),
        ));
    }

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for registering a new user (POST /register).
///
/// Creates the user unverified, issues their first OTP, and dispatches it
/// via the notification sender.
///
/// - On success, responds with `201 Created` and the user (unverified).
/// - Duplicate phone or email responds with `400 Bad Request`.
#[tracing::instrument(skip(state, req))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    // ---
    validate_registration(&req)?;

    let user = state
        .verification()
        .register(NewUser {
            name: req.name.trim().to_string(),
            phone_number: req.phone_number,
            date_of_birth: req.date_of_birth,
            email: req.email,
        })
        .await?;

    state.metrics().record_user_registered();

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handler for listing every registered user (GET /users).
#[tracing::instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, ApiError> {
    // ---
    let users = state.users().list_all().await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Handler for fetching one user by id (GET /users/{id}).
///
/// Responds with `404 Not Found` when the id is unknown.
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    // ---
    let user = state
        .users()
        .find_by_id(id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn request(name: &str, phone: &str, email: &str) -> RegisterRequest {
        // ---
        RegisterRequest {
            name: name.to_string(),
            phone_number: phone.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            email: email.to_string(),
        }
    }

    #[test]
    fn accepts_common_phone_shapes() {
        // ---
        for phone in ["555-0100", "+14155550100", "415 555 0100", "(415) 555-0100"] {
            let req = request("Ada", phone, "ada@example.com");
            assert!(validate_registration(&req).is_ok(), "rejected {phone}");
        }
    }

    #[test]
    fn rejects_malformed_phones() {
        // ---
        for phone in ["", "phone", "12345", "+"] {
            let req = request("Ada", phone, "ada@example.com");
            assert!(validate_registration(&req).is_err(), "accepted {phone:?}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        // ---
        for email in ["", "not-an-email", "a@b", "a b@example.com", "@example.com"] {
            let req = request("Ada", "555-0100", email);
            assert!(validate_registration(&req).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn rejects_blank_names() {
        // ---
        let req = request("   ", "555-0100", "ada@example.com");
        let err = validate_registration(&req).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
