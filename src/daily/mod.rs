// Public API
pub use generator::{generate, hash_date, seeded_random};
pub use models::{
    DailyChallengeRecord, DailyCompletion, DailyResult, DailyStats, DailyStreak, DailySummary,
    DAILY_XP,
};
pub use service::{DailyChallengeService, CHALLENGE_KEY, STATS_KEY, STREAK_KEY};

// Internal modules
mod generator;
mod models;
mod service;
