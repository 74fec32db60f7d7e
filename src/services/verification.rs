//! Registration and OTP verification workflow.
//!
//! Orchestrates the user directory and OTP store: registration issues a
//! first code, `request_otp` reissues (superseding any live code), and
//! `verify_otp` applies the verification decision logic. Code delivery is
//! delegated to the notifier and never fails the request.

use std::sync::Arc;

use chrono::Duration;
use rand::rngs::OsRng;
use rand::Rng;

use crate::config::OtpConfig;
use crate::domain::{
    Clock, ClockPtr, NewUser, OtpNotifier, OtpNotifierPtr, OtpStore, OtpStorePtr, User,
    UserDirectory, UserDirectoryPtr,
};
use crate::error::{ApiError, ApiResult};

/// Fixed length of every generated code: 4 decimal digits.
pub const OTP_CODE_LEN: usize = 4;

/// Orchestrates registration, OTP issuance, and verification.
pub struct VerificationService {
    // ---
    users: UserDirectoryPtr,
    otps: OtpStorePtr,
    clock: ClockPtr,
    notifier: OtpNotifierPtr,

    /// Validity window of an issued code, in whole seconds.
    ttl_secs: i64,
}

impl VerificationService {
    // ---
    pub fn new(
        users: UserDirectoryPtr,
        otps: OtpStorePtr,
        clock: ClockPtr,
        notifier: OtpNotifierPtr,
        config: &OtpConfig,
    ) -> Arc<Self> {
        // ---
        Arc::new(Self {
            users,
            otps,
            clock,
            notifier,
            ttl_secs: config.ttl.as_secs() as i64,
        })
    }

    /// Registers a new user and issues their first OTP.
    ///
    /// The directory's unique constraints are the authoritative duplicate
    /// guard; the lookups here only short-circuit the common case.
    pub async fn register(&self, new_user: NewUser) -> ApiResult<User> {
        // ---
        if self.users.find_by_phone(&new_user.phone_number).await?.is_some() {
            return Err(ApiError::DuplicatePhone);
        }
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }

        let user = self.users.create(new_user).await?;

        self.issue_and_dispatch(&user).await?;

        tracing::info!(user_id = user.id, "registered new user");

        Ok(user)
    }

    /// Issues a fresh OTP for an existing user, superseding any live one.
    pub async fn request_otp(&self, phone: &str) -> ApiResult<()> {
        // ---
        let user = self
            .users
            .find_by_phone(phone)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        self.issue_and_dispatch(&user).await
    }

    /// Applies the verification decision logic for a submitted code.
    ///
    /// - no live record: `OtpNotFound`
    /// - record expired: record deleted, `OtpExpired`
    /// - code mismatch before expiry: record retained, `OtpMismatch`
    /// - match before expiry: user marked verified, record consumed
    pub async fn verify_otp(&self, phone: &str, code: &str) -> ApiResult<()> {
        // ---
        let user = self
            .users
            .find_by_phone(phone)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let record = self
            .otps
            .latest_for(user.id)
            .await?
            .ok_or(ApiError::OtpNotFound)?;

        if record.expiry < self.clock.now() {
            self.otps.consume(record.id).await?;
            return Err(ApiError::OtpExpired);
        }

        if record.code != code {
            return Err(ApiError::OtpMismatch);
        }

        self.users.mark_verified(user.id).await?;
        self.otps.consume(record.id).await?;

        tracing::info!(user_id = user.id, "phone number verified");

        Ok(())
    }

    async fn issue_and_dispatch(&self, user: &User) -> ApiResult<()> {
        // ---
        let code = generate_code();
        let expiry = self.clock.now() + Duration::seconds(self.ttl_secs);

        self.otps
            .issue(user.id, &user.phone_number, &code, expiry)
            .await?;

        tracing::info!(user_id = user.id, %expiry, "issued OTP");

        // Fire-and-forget: delivery failure must not fail the request.
        if let Err(err) = self.notifier.send(&user.phone_number, &code).await {
            tracing::warn!(user_id = user.id, error = %err, "OTP delivery failed");
        }

        Ok(())
    }
}

/// Draws a fresh 4-digit code from the OS CSPRNG.
fn generate_code() -> String {
    // ---
    let n: u32 = OsRng.gen_range(0..10_000);
    format!("{n:04}")
}
