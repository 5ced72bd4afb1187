// Public API
pub use engine::{
    compute_power_level, compute_preview_power, compute_statistics, compute_statistics_at,
    compute_statistics_from_json, power_from_statistics, power_weights, MAX_POWER,
};
pub use errors::StatsError;
pub use models::{StatisticsRecord, TeamStatisticsRecord};
pub use rank::{pick_title, Rank, TitleGroup};
pub use team::{aggregate, team_power};

// Internal modules
mod engine;
mod errors;
mod models;
mod rank;
mod team;
