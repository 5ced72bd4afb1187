use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{
    AchievementStatus, BattleReport, BattleRequest, DailyBattleReport, FighterCard,
    RandomBattleRequest, TeamBattleReport, TeamBattleRequest,
};
use crate::daily::{DailyChallengeRecord, DailySummary};
use crate::leaderboard::{GlobalCounts, LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT};
use crate::ledger::{UsageLedgerRecord, WinnerTally, DEFAULT_TOP_WINNERS};
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    /// A missing or zero limit falls back to `default`.
    fn limit_or(&self, default: usize) -> usize {
        self.limit.filter(|limit| *limit > 0).unwrap_or(default)
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/fighters/:username", get(fighter_card))
        .route("/battles", post(create_battle))
        .route("/battles/random", post(create_random_battle))
        .route("/team-battles", post(create_team_battle))
        .route("/daily", get(daily_challenge))
        .route("/daily/battle", post(daily_battle))
        .route("/daily/stats", get(daily_stats))
        .route("/ledger", get(get_ledger).delete(clear_ledger))
        .route("/ledger/visit", post(record_visit))
        .route("/ledger/top-winners", get(top_winners))
        .route("/achievements", get(achievements))
        .route("/leaderboard", get(leaderboard))
        .route("/leaderboard/stats", get(leaderboard_stats))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// HTTP handler for previewing a fighter
///
/// GET /fighters/{username}
#[instrument(name = "fighter_card", skip(state))]
pub async fn fighter_card(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<FighterCard>, AppError> {
    let card = state.arena.fighter_card(&username).await?;
    Ok(Json(card))
}

/// HTTP handler for a one-on-one battle
///
/// POST /battles
/// Returns every round, the final result and the ledger update
#[instrument(name = "create_battle", skip(state))]
pub async fn create_battle(
    State(state): State<AppState>,
    Json(request): Json<BattleRequest>,
) -> Result<Json<BattleReport>, AppError> {
    info!(player1 = %request.player1, player2 = %request.player2, "Starting battle");

    let report = state
        .arena
        .battle(&request.player1, &request.player2, Utc::now())
        .await?;
    Ok(Json(report))
}

/// POST /battles/random
#[instrument(name = "create_random_battle", skip(state))]
pub async fn create_random_battle(
    State(state): State<AppState>,
    Json(request): Json<RandomBattleRequest>,
) -> Result<Json<BattleReport>, AppError> {
    let report = state.arena.random_battle(&request.player, Utc::now()).await?;
    Ok(Json(report))
}

/// POST /team-battles
#[instrument(name = "create_team_battle", skip(state))]
pub async fn create_team_battle(
    State(state): State<AppState>,
    Json(request): Json<TeamBattleRequest>,
) -> Result<Json<TeamBattleReport>, AppError> {
    let report = state
        .arena
        .team_battle(&request.alpha, &request.beta)
        .await?;
    Ok(Json(report))
}

/// GET /daily
pub async fn daily_challenge(State(state): State<AppState>) -> Json<DailyChallengeRecord> {
    Json(state.arena.daily_challenge(Utc::now().date_naive()).await)
}

/// HTTP handler for fighting today's challenge
///
/// POST /daily/battle
#[instrument(name = "daily_battle", skip(state))]
pub async fn daily_battle(
    State(state): State<AppState>,
) -> Result<Json<DailyBattleReport>, AppError> {
    let report = state.arena.daily_battle(Utc::now()).await?;
    Ok(Json(report))
}

/// GET /daily/stats
pub async fn daily_stats(State(state): State<AppState>) -> Json<DailySummary> {
    Json(state.arena.daily_summary(Utc::now().date_naive()).await)
}

/// GET /ledger
pub async fn get_ledger(State(state): State<AppState>) -> Json<UsageLedgerRecord> {
    Json(state.arena.ledger(Utc::now()).await)
}

/// DELETE /ledger
#[instrument(name = "clear_ledger", skip(state))]
pub async fn clear_ledger(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.arena.clear_ledger().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /ledger/visit
pub async fn record_visit(
    State(state): State<AppState>,
) -> Result<Json<UsageLedgerRecord>, AppError> {
    Ok(Json(state.arena.record_visit(Utc::now()).await?))
}

/// GET /ledger/top-winners?limit=
pub async fn top_winners(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<WinnerTally>> {
    let limit = query.limit_or(DEFAULT_TOP_WINNERS);
    Json(state.arena.top_winners(limit, Utc::now()).await)
}

/// GET /achievements
pub async fn achievements(State(state): State<AppState>) -> Json<Vec<AchievementStatus>> {
    Json(state.arena.achievements(Utc::now()).await)
}

/// GET /leaderboard?limit=
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = query.limit_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(state.arena.leaderboard(limit).await?))
}

/// GET /leaderboard/stats
pub async fn leaderboard_stats(
    State(state): State<AppState>,
) -> Result<Json<GlobalCounts>, AppError> {
    Ok(Json(state.arena.leaderboard_counts().await?))
}
