//! Score submission, daily rank, and weekly score handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Metrics, RankSnapshot, ScoreEntry, MAX_SCORE, MIN_SCORE};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    // ---
    pub user_id: i64,
    pub score: i32,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    // ---
    pub id: i64,
    pub user_id: i64,
    pub score: i32,
    pub timestamp: DateTime<Utc>,
}

impl From<ScoreEntry> for ScoreResponse {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            score: entry.score,
            timestamp: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    // ---
    pub rank: u32,
    pub score: i32,
    pub date: NaiveDate,
}

impl From<RankSnapshot> for RankResponse {
    fn from(snapshot: RankSnapshot) -> Self {
        Self {
            rank: snapshot.rank,
            score: snapshot.score,
            date: snapshot.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeeklyScoresResponse {
    // ---
    pub success: bool,
    pub weekly: Vec<i32>,
}

fn validate_score_bounds(score: i32) -> ApiResult<()> {
    // ---
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ApiError::InvalidRequest(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for submitting a score (POST /scores).
///
/// The score value must be within bounds; the 3-per-day cap and user
/// existence are enforced atomically in the ledger.
///
/// - On success, responds with `201 Created` and the stored entry.
/// - Unknown user → `404 Not Found`; cap reached → `400 Bad Request`.
#[tracing::instrument(skip(state, req))]
pub async fn add_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<(StatusCode, Json<ScoreResponse>), ApiError> {
    // ---
    validate_score_bounds(req.score)?;

    let entry = state.ranking().submit(req.user_id, req.score).await?;

    state.metrics().record_score_submitted();

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Handler for today's rank (GET /scores/rank/{user_id}).
///
/// Returns the user's 1-based rank among all of today's entries, their
/// score for the day, and the reference date. Rendering this as a shareable
/// card is the client's concern.
///
/// - No entry today → `404 Not Found`.
#[tracing::instrument(skip(state))]
pub async fn get_rank(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<RankResponse>, ApiError> {
    // ---
    let snapshot = state.ranking().rank_today(user_id).await?;

    Ok(Json(snapshot.into()))
}

/// Handler for this week's scores (GET /scores/weekly/{user_id}).
///
/// Returns the user's scores for the current Monday-through-Sunday week in
/// submission order. An empty week responds `200 OK` with `success=false`.
#[tracing::instrument(skip(state))]
pub async fn get_weekly_scores(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<WeeklyScoresResponse>, ApiError> {
    // ---
    let weekly = state.ranking().weekly(user_id).await?;

    Ok(Json(WeeklyScoresResponse {
        success: !weekly.is_empty(),
        weekly,
    }))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        // ---
        assert!(validate_score_bounds(50).is_ok());
        assert!(validate_score_bounds(500).is_ok());
        assert!(validate_score_bounds(275).is_ok());
    }

    #[test]
    fn out_of_range_scores_fail() {
        // ---
        for score in [0, 49, 501, -100] {
            assert!(validate_score_bounds(score).is_err(), "accepted {score}");
        }
    }
}
