use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::{
    day_bounds, date_of, range_bounds, NewUser, OtpRecord, OtpStore, ScoreEntry, ScoreLedger,
    User, UserDirectory,
};
use crate::error::{ApiError, ApiResult};

/// Per-user, per-day ceiling on ledger entries.
const DAILY_SCORE_CAP: i64 = 3;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    phone_number: String,
    date_of_birth: NaiveDate,
    email: String,
    is_verified: bool,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            name: r.name,
            phone_number: r.phone_number,
            date_of_birth: r.date_of_birth,
            email: r.email,
            is_verified: r.is_verified,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OtpRow {
    id: i64,
    user_id: i64,
    phone_number: String,
    code: String,
    expiry: DateTime<Utc>,
}

impl From<OtpRow> for OtpRecord {
    fn from(r: OtpRow) -> Self {
        OtpRecord {
            id: r.id,
            user_id: r.user_id,
            phone_number: r.phone_number,
            code: r.code,
            expiry: r.expiry,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    id: i64,
    user_id: i64,
    score: i32,
    created_at: DateTime<Utc>,
}

impl From<ScoreRow> for ScoreEntry {
    fn from(r: ScoreRow) -> Self {
        ScoreEntry {
            id: r.id,
            user_id: r.user_id,
            score: r.score,
            created_at: r.created_at,
        }
    }
}

pub fn create_postgres_repository(pool: PgPool) -> Arc<PostgresRepository> {
    // ---
    Arc::new(PostgresRepository::new(pool))
}

/// PostgreSQL backend for all three storage traits.
///
/// The unique indexes on `users` are the authoritative uniqueness guard;
/// the multi-step operations (`issue`, `append`) run inside a transaction
/// that locks the user row first, which serializes them per user.
pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }

    /// Lock the user's row for the rest of the transaction.
    ///
    /// Returns false when the user does not exist.
    async fn lock_user(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: i64,
    ) -> ApiResult<bool> {
        // ---
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(locked.is_some())
    }
}

/// Map unique-constraint rejections onto the duplicate error kinds.
fn translate_unique_violation(err: sqlx::Error) -> ApiError {
    // ---
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("users_phone_number_key") => return ApiError::DuplicatePhone,
                Some("users_email_key") => return ApiError::DuplicateEmail,
                _ => {}
            }
        }
    }

    ApiError::Storage(err)
}

#[async_trait::async_trait]
impl UserDirectory for PostgresRepository {
    // ---
    async fn find_by_phone(&self, phone: &str) -> ApiResult<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone_number, date_of_birth, email, is_verified
             FROM users WHERE phone_number = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone_number, date_of_birth, email, is_verified
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: i64) -> ApiResult<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone_number, date_of_birth, email, is_verified
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn list_all(&self) -> ApiResult<Vec<User>> {
        // ---
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone_number, date_of_birth, email, is_verified
             FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, new_user: NewUser) -> ApiResult<User> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, phone_number, date_of_birth, email, is_verified)
             VALUES ($1, $2, $3, $4, FALSE)
             RETURNING id, name, phone_number, date_of_birth, email, is_verified",
        )
        .bind(&new_user.name)
        .bind(&new_user.phone_number)
        .bind(new_user.date_of_birth)
        .bind(&new_user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)?;

        Ok(row.into())
    }

    async fn mark_verified(&self, user_id: i64) -> ApiResult<()> {
        // ---
        let result = sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::UserNotFound);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl OtpStore for PostgresRepository {
    // ---
    async fn issue(
        &self,
        user_id: i64,
        phone: &str,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> ApiResult<()> {
        // ---
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent issuance for the same user; without the lock
        // two callers could each delete then insert, leaving two live codes.
        if !Self::lock_user(&mut tx, user_id).await? {
            return Err(ApiError::UserNotFound);
        }

        sqlx::query("DELETE FROM otps WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO otps (user_id, phone_number, code, expiry)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(phone)
        .bind(code)
        .bind(expiry)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn latest_for(&self, user_id: i64) -> ApiResult<Option<OtpRecord>> {
        // ---
        let row = sqlx::query_as::<_, OtpRow>(
            "SELECT id, user_id, phone_number, code, expiry
             FROM otps WHERE user_id = $1
             ORDER BY expiry DESC, id DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OtpRecord::from))
    }

    async fn consume(&self, otp_id: i64) -> ApiResult<()> {
        // ---
        sqlx::query("DELETE FROM otps WHERE id = $1")
            .bind(otp_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl ScoreLedger for PostgresRepository {
    // ---
    async fn count_for_user_on(&self, user_id: i64, date: NaiveDate) -> ApiResult<i64> {
        // ---
        let (start, end) = day_bounds(date);

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scores
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn append(&self, user_id: i64, score: i32, now: DateTime<Utc>) -> ApiResult<ScoreEntry> {
        // ---
        let mut tx = self.pool.begin().await?;

        // The row lock serializes same-user appends, so two concurrent
        // submissions cannot both pass the count check for the last slot.
        if !Self::lock_user(&mut tx, user_id).await? {
            return Err(ApiError::UserNotFound);
        }

        let (start, end) = day_bounds(date_of(now));
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scores
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await?;

        if count >= DAILY_SCORE_CAP {
            return Err(ApiError::DailyCapExceeded);
        }

        let row = sqlx::query_as::<_, ScoreRow>(
            "INSERT INTO scores (user_id, score, created_at)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, score, created_at",
        )
        .bind(user_id)
        .bind(score)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn first_for_user_on(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> ApiResult<Option<ScoreEntry>> {
        // ---
        let (start, end) = day_bounds(date);

        let row = sqlx::query_as::<_, ScoreRow>(
            "SELECT id, user_id, score, created_at FROM scores
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
             ORDER BY created_at, id
             LIMIT 1",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ScoreEntry::from))
    }

    async fn entries_on(&self, date: NaiveDate) -> ApiResult<Vec<ScoreEntry>> {
        // ---
        let (start, end) = day_bounds(date);

        let rows = sqlx::query_as::<_, ScoreRow>(
            "SELECT id, user_id, score, created_at FROM scores
             WHERE created_at >= $1 AND created_at < $2
             ORDER BY score DESC, created_at, id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreEntry::from).collect())
    }

    async fn weekly_scores(
        &self,
        user_id: i64,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> ApiResult<Vec<i32>> {
        // ---
        let (start, end) = range_bounds(week_start, week_end);

        let scores = sqlx::query_scalar::<_, i32>(
            "SELECT score FROM scores
             WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
             ORDER BY created_at, id",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }
}
