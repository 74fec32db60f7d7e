use serde::Serialize;

/// Plain human-readable confirmation body.
///
/// Used by the OTP endpoints, which confirm an action rather than return an
/// entity.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
