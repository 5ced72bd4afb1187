// Public API
pub use client::{HttpLeaderboardClient, LeaderboardClient};
pub use errors::LeaderboardError;
pub use memory::InMemoryLeaderboard;
pub use models::{
    validate_handle, BattleSubmission, GlobalCounts, LeaderboardEntry, RecordedBattle, Scores,
    DEFAULT_LEADERBOARD_LIMIT, MIN_RANKED_BATTLES, RECENT_BATTLES_SHOWN,
};
pub(crate) use models::{LeaderboardEnvelope, StatsEnvelope};

// Internal modules
mod client;
mod errors;
mod memory;
mod models;
