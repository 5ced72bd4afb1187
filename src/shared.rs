use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::arena::ArenaService;
use crate::battle::BattleError;
use crate::github::FetchError;
use crate::leaderboard::LeaderboardError;
use crate::ledger::LedgerError;
use crate::stats::StatsError;
use crate::store::StoreError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub arena: Arc<ArenaService>,
}

impl AppState {
    pub fn new(arena: Arc<ArenaService>) -> Self {
        Self { arena }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A team needs at least one member")]
    EmptyTeam,

    #[error("{0}")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded. Try again later.")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) | AppError::EmptyTeam => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidState(_) | AppError::Storage(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(_) => AppError::NotFound(err.to_string()),
            FetchError::RateLimited => AppError::RateLimited,
            FetchError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::InvalidInput(msg) => AppError::InvalidInput(msg),
            StatsError::EmptyTeam => AppError::EmptyTeam,
        }
    }
}

impl From<BattleError> for AppError {
    fn from(err: BattleError) -> Self {
        match err {
            BattleError::InvalidState(msg) => AppError::InvalidState(msg),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidInput(msg) => AppError::InvalidInput(msg),
            LedgerError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<LeaderboardError> for AppError {
    fn from(err: LeaderboardError) -> Self {
        match err {
            LeaderboardError::InvalidInput(msg) => AppError::InvalidInput(msg),
            LeaderboardError::Transport(msg) | LeaderboardError::Upstream(msg) => {
                AppError::Upstream(msg)
            }
        }
    }
}
