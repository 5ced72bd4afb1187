use serde::{Deserialize, Serialize};

/// Numeric snapshot derived from one profile fetch.
///
/// Every field is non-negative and finite. The record is never patched;
/// a new fetch produces a new record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub stars: u64,
    pub repos: u64,
    pub followers: u64,
    pub forks: u64,
    /// Account age in Julian years.
    pub age: f64,
    pub stars_per_repo: f64,
    /// Followers per followed account.
    pub follower_ratio: f64,
    /// Heuristic estimate derived from repository update cadence.
    pub pull_requests: u64,
    pub issues: u64,
    /// Heuristic monthly commit estimate, one decimal.
    pub commit_freq: f64,
    pub languages: u64,
    pub gists: u64,
}

impl StatisticsRecord {
    pub fn is_well_formed(&self) -> bool {
        [
            self.age,
            self.stars_per_repo,
            self.follower_ratio,
            self.commit_freq,
        ]
        .iter()
        .all(|value| value.is_finite() && *value >= 0.0)
    }
}

/// Aggregate of several members' statistics, battled like a single fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatisticsRecord {
    pub members: usize,
    pub statistics: StatisticsRecord,
}
