use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score value accepted at the boundary, inclusive.
pub const MIN_SCORE: i32 = 50;

/// Highest score value accepted at the boundary, inclusive.
pub const MAX_SCORE: i32 = 500;

/// A registered user, keyed by unique phone number and unique email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // ---
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub email: String,

    /// False until the phone number is proven via OTP; flips true exactly once.
    pub is_verified: bool,
}

/// Registration input, validated at the HTTP boundary before it gets here.
#[derive(Debug, Clone)]
pub struct NewUser {
    // ---
    pub name: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
}

/// A live one-time password.
///
/// The phone number is a denormalized copy taken at issuance time, so the
/// record stays meaningful even if the user's number were ever re-keyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    // ---
    pub id: i64,
    pub user_id: i64,
    pub phone_number: String,
    pub code: String,
    pub expiry: DateTime<Utc>,
}

/// One append-only ledger entry. Never mutated or deleted after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    // ---
    pub id: i64,
    pub user_id: i64,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// A user's standing for one calendar date.
#[derive(Debug, Clone, Serialize)]
pub struct RankSnapshot {
    /// 1-based rank; equal scores share the same rank.
    pub rank: u32,
    /// The user's score for the day (their earliest entry).
    pub score: i32,
    /// The date the standing refers to.
    pub date: NaiveDate,
}
