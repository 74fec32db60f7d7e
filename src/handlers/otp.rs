//! OTP request and verification handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::domain::Metrics;
use crate::error::{ApiError, ApiResult};
use crate::handlers::shared_types::MessageResponse;
use crate::services::OTP_CODE_LEN;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    // ---
    pub phone_number: String,
    pub otp: String,
}

fn validate_code_shape(code: &str) -> ApiResult<()> {
    // ---
    if code.len() != OTP_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::InvalidRequest(format!(
            "otp must be exactly {OTP_CODE_LEN} digits"
        )));
    }

    Ok(())
}

/// Handler for reissuing an OTP (POST /request-otp/{phone}).
///
/// Supersedes any live code for the user and dispatches the fresh one.
///
/// - Responds with `404 Not Found` if no user has the phone number.
#[tracing::instrument(skip(state, phone))]
pub async fn request_otp(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // ---
    state.verification().request_otp(&phone).await?;

    Ok(Json(MessageResponse {
        message: format!("OTP sent to {phone}."),
    }))
}

/// Handler for verifying a phone number (POST /verify-otp).
///
/// Applies the full verification decision logic:
/// - unknown phone → `404 Not Found`
/// - no live code → `404 Not Found`
/// - expired code → `400 Bad Request` (the record is consumed)
/// - wrong code → `400 Bad Request` (the record survives for retry)
/// - correct code → the user is marked verified and the record consumed
#[tracing::instrument(skip(state, req))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // ---
    validate_code_shape(&req.otp)?;

    state
        .verification()
        .verify_otp(&req.phone_number, &req.otp)
        .await?;

    state.metrics().record_phone_verified();

    Ok(Json(MessageResponse {
        message: "Phone number verified successfully!".to_string(),
    }))
}
