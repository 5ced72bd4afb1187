use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::battle::RoundWinner;

pub const DAILY_XP: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyResult {
    Player1,
    Player2,
    Tie,
}

impl From<RoundWinner> for DailyResult {
    fn from(winner: RoundWinner) -> Self {
        match winner {
            RoundWinner::Player1 => DailyResult::Player1,
            RoundWinner::Player2 => DailyResult::Player2,
            RoundWinner::Tie => DailyResult::Tie,
        }
    }
}

/// The pairing for one calendar date. Only the completion fields ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallengeRecord {
    pub date: NaiveDate,
    pub player1: String,
    pub player2: String,
    pub completed: bool,
    pub result: Option<DailyResult>,
    pub xp_awarded: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    pub total_completed: u64,
    pub wins: u64,
    /// Never incremented; a decisive result counts as a win.
    pub losses: u64,
    pub ties: u64,
}

impl DailyStats {
    pub fn record(&mut self, result: DailyResult) {
        self.total_completed += 1;
        match result {
            DailyResult::Tie => self.ties += 1,
            DailyResult::Player1 | DailyResult::Player2 => self.wins += 1,
        }
    }
}

/// Consecutive days with a completed challenge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStreak {
    pub current: u32,
    pub last_completed: Option<NaiveDate>,
}

impl DailyStreak {
    pub fn complete(&mut self, today: NaiveDate) {
        match self.last_completed {
            Some(last) if last == today => return,
            Some(last) if today.pred_opt() == Some(last) => self.current += 1,
            _ => self.current = 1,
        }
        self.last_completed = Some(today);
    }

    /// Drops the streak to zero when the last completion is older than
    /// yesterday. Returns whether anything changed.
    pub fn validate(&mut self, today: NaiveDate) -> bool {
        match self.last_completed {
            Some(last) if (today - last).num_days() > 1 && self.current != 0 => {
                self.current = 0;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub challenge: DailyChallengeRecord,
    pub already_completed: bool,
    pub streak: u32,
    pub stats: DailyStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub stats: DailyStats,
    pub streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let mut streak = DailyStreak::default();
        streak.complete(day(1));
        streak.complete(day(2));
        streak.complete(day(3));
        assert_eq!(streak.current, 3);

        // Same day twice counts once.
        streak.complete(day(3));
        assert_eq!(streak.current, 3);
    }

    #[test]
    fn gap_restarts_streak() {
        let mut streak = DailyStreak::default();
        streak.complete(day(1));
        streak.complete(day(2));
        streak.complete(day(5));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.last_completed, Some(day(5)));
    }

    #[test]
    fn validation_resets_stale_streak_only() {
        let mut streak = DailyStreak {
            current: 4,
            last_completed: Some(day(10)),
        };
        assert!(!streak.validate(day(11)));
        assert_eq!(streak.current, 4);

        assert!(streak.validate(day(12)));
        assert_eq!(streak.current, 0);
    }

    #[test]
    fn decisive_results_count_as_wins() {
        let mut stats = DailyStats::default();
        stats.record(DailyResult::Player1);
        stats.record(DailyResult::Player2);
        stats.record(DailyResult::Tie);

        assert_eq!(
            stats,
            DailyStats {
                total_completed: 3,
                wins: 2,
                losses: 0,
                ties: 1,
            }
        );
    }
}
