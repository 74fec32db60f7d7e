use super::models::{NewUser, OtpRecord, ScoreEntry, User};
use crate::error::ApiResult;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// Abstraction for the registered-user store.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    // ---
    /// Exact-match lookup by phone number.
    async fn find_by_phone(&self, phone: &str) -> ApiResult<Option<User>>;

    /// Exact-match lookup by email.
    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>>;

    /// Lookup by surrogate id.
    async fn find_by_id(&self, id: i64) -> ApiResult<Option<User>>;

    /// All registered users, oldest first.
    async fn list_all(&self) -> ApiResult<Vec<User>>;

    /// Insert a new unverified user.
    ///
    /// Fails with `DuplicatePhone` / `DuplicateEmail` when the unique
    /// constraints reject the row; the storage layer is the authoritative
    /// guard, callers may pre-check only as a fast path.
    async fn create(&self, new_user: NewUser) -> ApiResult<User>;

    /// Set the verification flag. Idempotent; `UserNotFound` if the id
    /// does not exist.
    async fn mark_verified(&self, user_id: i64) -> ApiResult<()>;
}

/// Abstraction for live OTP records. At most one per user survives `issue`.
#[async_trait::async_trait]
pub trait OtpStore: Send + Sync {
    // ---
    /// Replace any live OTP for the user with a fresh one.
    ///
    /// Delete-then-insert runs as one atomic unit serialized per user, so
    /// two concurrent issuances can never both survive.
    async fn issue(
        &self,
        user_id: i64,
        phone: &str,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> ApiResult<()>;

    /// The user's OTP with the latest expiry, if any.
    ///
    /// There is at most one record on the normal path; picking the latest
    /// expiry is the defensive tie-break for racy duplicates.
    async fn latest_for(&self, user_id: i64) -> ApiResult<Option<OtpRecord>>;

    /// Delete a record by id, on successful verification or on expiry.
    async fn consume(&self, otp_id: i64) -> ApiResult<()>;
}

/// Abstraction for the append-only score ledger.
#[async_trait::async_trait]
pub trait ScoreLedger: Send + Sync {
    // ---
    /// Number of entries the user recorded on the given calendar date.
    async fn count_for_user_on(&self, user_id: i64, date: NaiveDate) -> ApiResult<i64>;

    /// Append an entry timestamped `now`.
    ///
    /// Existence check, daily-cap check, and insert run as one atomic unit
    /// serialized per user. Fails with `UserNotFound` or `DailyCapExceeded`.
    async fn append(&self, user_id: i64, score: i32, now: DateTime<Utc>) -> ApiResult<ScoreEntry>;

    /// The user's earliest entry on the given date, if any.
    async fn first_for_user_on(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> ApiResult<Option<ScoreEntry>>;

    /// Every entry on the given date, highest score first; equal scores
    /// order by earlier submission, then id.
    async fn entries_on(&self, date: NaiveDate) -> ApiResult<Vec<ScoreEntry>>;

    /// The user's score values between the inclusive date bounds, ascending
    /// by submission time.
    async fn weekly_scores(
        &self,
        user_id: i64,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> ApiResult<Vec<i32>>;
}

/// Type aliases for any backend implementing the storage traits.
pub type UserDirectoryPtr = Arc<dyn UserDirectory>;
pub type OtpStorePtr = Arc<dyn OtpStore>;
pub type ScoreLedgerPtr = Arc<dyn ScoreLedger>;
