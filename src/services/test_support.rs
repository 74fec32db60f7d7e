//! In-memory trait implementations for exercising the workflows without
//! PostgreSQL. Semantics mirror the real repository: unique phone/email,
//! single live OTP per user, 3-per-day ledger cap, deterministic ordering.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::config::OtpConfig;
use crate::domain::{
    date_of, range_bounds, Clock, NewUser, OtpNotifier, OtpRecord, OtpStore, ScoreEntry,
    ScoreLedger, User, UserDirectory,
};
use crate::error::{ApiError, ApiResult};
use crate::services::{RankingService, VerificationService};

pub fn fixture_user(phone: &str, email: &str) -> NewUser {
    // ---
    NewUser {
        name: "Test User".to_string(),
        phone_number: phone.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        email: email.to_string(),
    }
}

// ============================================================================
// Manual clock
// ============================================================================

/// Clock whose current instant is set by the test.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    // ---
    /// Starts on Wednesday 2024-05-15 12:00:00 UTC, mid-week and mid-day so
    /// small advances stay inside the same date.
    pub fn new() -> Arc<Self> {
        // ---
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()),
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        // ---
        *self.now.lock().unwrap()
    }

    pub fn advance(&self, by: Duration) {
        // ---
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set_ymd_hms(&self, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) {
        // ---
        *self.now.lock().unwrap() = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap();
    }
}

impl Clock for ManualClock {
    // ---
    fn now(&self) -> DateTime<Utc> {
        ManualClock::now(self)
    }
}

// ============================================================================
// Recording notifier
// ============================================================================

/// Notifier that records every dispatched (phone, code) pair.
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    // ---
    pub fn new() -> Arc<Self> {
        // ---
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        // ---
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OtpNotifier for RecordingNotifier {
    // ---
    async fn send(&self, phone: &str, code: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string()));
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    otps: Vec<OtpRecord>,
    scores: Vec<ScoreEntry>,
    next_user_id: i64,
    next_otp_id: i64,
    next_score_id: i64,
}

/// One store backing all three storage traits, like the real repository.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    // ---
    pub fn new() -> Arc<Self> {
        // ---
        Arc::new(Self {
            inner: Mutex::new(Inner {
                next_user_id: 1,
                next_otp_id: 1,
                next_score_id: 1,
                ..Inner::default()
            }),
        })
    }

    /// Insert a user without going through the verification workflow.
    pub async fn create_direct(&self, new_user: NewUser) -> User {
        // ---
        self.create(new_user).await.expect("fixture user is unique")
    }

    /// Live OTP records for a user; should never exceed one.
    pub fn otp_count_for(&self, user_id: i64) -> usize {
        // ---
        self.inner
            .lock()
            .unwrap()
            .otps
            .iter()
            .filter(|o| o.user_id == user_id)
            .count()
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryStore {
    // ---
    async fn find_by_phone(&self, phone: &str) -> ApiResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.phone_number == phone).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> ApiResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_all(&self) -> ApiResult<Vec<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.clone())
    }

    async fn create(&self, new_user: NewUser) -> ApiResult<User> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .users
            .iter()
            .any(|u| u.phone_number == new_user.phone_number)
        {
            return Err(ApiError::DuplicatePhone);
        }
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(ApiError::DuplicateEmail);
        }

        let user = User {
            id: inner.next_user_id,
            name: new_user.name,
            phone_number: new_user.phone_number,
            date_of_birth: new_user.date_of_birth,
            email: new_user.email,
            is_verified: false,
        };
        inner.next_user_id += 1;
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn mark_verified(&self, user_id: i64) -> ApiResult<()> {
        let mut inner = self.inner.lock().unwrap();

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ApiError::UserNotFound)?;
        user.is_verified = true;

        Ok(())
    }
}

#[async_trait::async_trait]
impl OtpStore for MemoryStore {
    // ---
    async fn issue(
        &self,
        user_id: i64,
        phone: &str,
        code: &str,
        expiry: DateTime<Utc>,
    ) -> ApiResult<()> {
        let mut inner = self.inner.lock().unwrap();

        inner.otps.retain(|o| o.user_id != user_id);

        let record = OtpRecord {
            id: inner.next_otp_id,
            user_id,
            phone_number: phone.to_string(),
            code: code.to_string(),
            expiry,
        };
        inner.next_otp_id += 1;
        inner.otps.push(record);

        Ok(())
    }

    async fn latest_for(&self, user_id: i64) -> ApiResult<Option<OtpRecord>> {
        let inner = self.inner.lock().unwrap();

        Ok(inner
            .otps
            .iter()
            .filter(|o| o.user_id == user_id)
            .max_by_key(|o| (o.expiry, o.id))
            .cloned())
    }

    async fn consume(&self, otp_id: i64) -> ApiResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.otps.retain(|o| o.id != otp_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ScoreLedger for MemoryStore {
    // ---
    async fn count_for_user_on(&self, user_id: i64, date: NaiveDate) -> ApiResult<i64> {
        let inner = self.inner.lock().unwrap();

        Ok(inner
            .scores
            .iter()
            .filter(|s| s.user_id == user_id && date_of(s.created_at) == date)
            .count() as i64)
    }

    async fn append(&self, user_id: i64, score: i32, now: DateTime<Utc>) -> ApiResult<ScoreEntry> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.users.iter().any(|u| u.id == user_id) {
            return Err(ApiError::UserNotFound);
        }

        let today = date_of(now);
        let todays = inner
            .scores
            .iter()
            .filter(|s| s.user_id == user_id && date_of(s.created_at) == today)
            .count();
        if todays >= 3 {
            return Err(ApiError::DailyCapExceeded);
        }

        let entry = ScoreEntry {
            id: inner.next_score_id,
            user_id,
            score,
            created_at: now,
        };
        inner.next_score_id += 1;
        inner.scores.push(entry.clone());

        Ok(entry)
    }

    async fn first_for_user_on(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> ApiResult<Option<ScoreEntry>> {
        let inner = self.inner.lock().unwrap();

        Ok(inner
            .scores
            .iter()
            .filter(|s| s.user_id == user_id && date_of(s.created_at) == date)
            .min_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn entries_on(&self, date: NaiveDate) -> ApiResult<Vec<ScoreEntry>> {
        let inner = self.inner.lock().unwrap();

        let mut entries: Vec<ScoreEntry> = inner
            .scores
            .iter()
            .filter(|s| date_of(s.created_at) == date)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        Ok(entries)
    }

    async fn weekly_scores(
        &self,
        user_id: i64,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> ApiResult<Vec<i32>> {
        let inner = self.inner.lock().unwrap();
        let (start, end) = range_bounds(week_start, week_end);

        let mut entries: Vec<&ScoreEntry> = inner
            .scores
            .iter()
            .filter(|s| s.user_id == user_id && s.created_at >= start && s.created_at < end)
            .collect();
        entries.sort_by_key(|s| (s.created_at, s.id));

        Ok(entries.iter().map(|s| s.score).collect())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Bundles the in-memory collaborators behind ready-made services.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    // ---
    pub fn new() -> Self {
        // ---
        Self {
            store: MemoryStore::new(),
            clock: ManualClock::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn verification(&self) -> Arc<VerificationService> {
        // ---
        let config = OtpConfig {
            ttl: std::time::Duration::from_secs(60),
        };

        VerificationService::new(
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
            self.notifier.clone(),
            &config,
        )
    }

    pub fn ranking(&self) -> Arc<RankingService> {
        // ---
        RankingService::new(self.store.clone(), self.clock.clone())
    }
}
