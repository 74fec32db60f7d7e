//! Daily ranking and weekly aggregation workflow.
//!
//! Score submission delegates to the ledger, which owns the daily-cap
//! atomicity. Ranking is competition style: entries with equal scores share
//! the same rank, and a user's score for the day is their earliest entry.

use std::sync::Arc;

use crate::domain::{
    date_of, week_bounds, Clock, ClockPtr, RankSnapshot, ScoreEntry, ScoreLedger, ScoreLedgerPtr,
};
use crate::error::{ApiError, ApiResult};

/// Orchestrates the score ledger for submission, ranking, and weekly views.
pub struct RankingService {
    // ---
    scores: ScoreLedgerPtr,
    clock: ClockPtr,
}

impl RankingService {
    // ---
    pub fn new(scores: ScoreLedgerPtr, clock: ClockPtr) -> Arc<Self> {
        // ---
        Arc::new(Self { scores, clock })
    }

    /// Appends a score entry timestamped now.
    ///
    /// Value bounds are the caller's concern; user existence and the
    /// 3-per-day cap are enforced atomically inside the ledger.
    pub async fn submit(&self, user_id: i64, score: i32) -> ApiResult<ScoreEntry> {
        // ---
        let entry = self.scores.append(user_id, score, self.clock.now()).await?;

        tracing::info!(user_id, score, "score recorded");

        Ok(entry)
    }

    /// The user's standing among all of today's entries.
    ///
    /// Rank is 1 plus the number of entries with a strictly greater score,
    /// so equal scores share a rank. The user's own score is their earliest
    /// entry of the day.
    pub async fn rank_today(&self, user_id: i64) -> ApiResult<RankSnapshot> {
        // ---
        let today = date_of(self.clock.now());

        let mine = self
            .scores
            .first_for_user_on(user_id, today)
            .await?
            .ok_or(ApiError::NoScoreToday)?;

        let entries = self.scores.entries_on(today).await?;

        // Both queries ran outside one snapshot; guard the gap.
        if !entries.iter().any(|e| e.user_id == user_id) {
            return Err(ApiError::UserNotRankedToday);
        }

        let rank = entries.iter().filter(|e| e.score > mine.score).count() as u32 + 1;

        Ok(RankSnapshot {
            rank,
            score: mine.score,
            date: today,
        })
    }

    /// The user's scores for the current Monday-through-Sunday week,
    /// ascending by submission time. An empty week is not an error.
    pub async fn weekly(&self, user_id: i64) -> ApiResult<Vec<i32>> {
        // ---
        let (week_start, week_end) = week_bounds(date_of(self.clock.now()));

        self.scores.weekly_scores(user_id, week_start, week_end).await
    }
}
