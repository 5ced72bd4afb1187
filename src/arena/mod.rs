// Public API
pub use handlers::routes;
pub use models::{
    AchievementStatus, BattleReport, BattleRequest, DailyBattleReport, FighterCard,
    RandomBattleRequest, TeamBattleReport, TeamBattleRequest, TeamSide,
};
pub use service::{ArenaService, ArenaServiceBuilder, MAX_TEAM_SIZE, MIN_TEAM_SIZE};

// Internal modules
mod handlers;
mod models;
mod service;
