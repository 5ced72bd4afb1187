// Library crate for the Git Fight battle server
// This file exposes the public API for the binary and integration tests

pub mod arena;
pub mod battle;
pub mod config;
pub mod daily;
pub mod github;
pub mod leaderboard;
pub mod ledger;
pub mod roster;
pub mod shared;
pub mod stats;
pub mod store;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use arena::{ArenaService, ArenaServiceBuilder};
pub use battle::{BattleCategory, BattleResult, BattleState};
pub use config::{AppConfig, StoreBackend};
pub use github::{FetchError, GithubClient, ProfileRecord, ProfileSource, RepositorySummary};
pub use leaderboard::{HttpLeaderboardClient, InMemoryLeaderboard, LeaderboardClient};
pub use shared::{AppError, AppState};
pub use stats::StatisticsRecord;
pub use store::{InMemoryKeyValueStore, KeyValueStore};

/// Builds the HTTP application with tracing and CORS layers applied.
pub fn app(state: AppState) -> Router {
    arena::routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
