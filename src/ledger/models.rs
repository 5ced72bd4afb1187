use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{AchievementId, LedgerError, ACHIEVEMENTS};
use crate::battle::{advance_streak, PERFECT_SCORE};
use crate::roster;

pub const RECENT_BATTLES_CAP: usize = 50;
pub const XP_PER_LEVEL: u64 = 200;
pub const WIN_BASE_XP: u64 = 50;
pub const XP_PER_POINT: u64 = 10;
pub const XP_PER_STREAK: u64 = 20;
pub const TIE_XP: u64 = 25;
pub const DEFAULT_TOP_WINNERS: usize = 5;

/// A finished battle as the ledger sees it. `winner` is `None` on a tie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub player1: String,
    pub player2: String,
    pub winner: Option<String>,
    pub player1_score: u32,
    pub player2_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentBattle {
    pub player1: String,
    pub player2: String,
    pub winner: Option<String>,
    pub player1_score: u32,
    pub player2_score: u32,
    pub timestamp: DateTime<Utc>,
}

/// What a single ledger mutation changed, for presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub xp_gained: u64,
    pub levels_gained: u32,
    pub xp: u64,
    pub level: u32,
    pub current_streak: u32,
    pub perfect: bool,
    pub new_achievements: Vec<AchievementId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerTally {
    pub username: String,
    pub wins: u64,
}

/// Lifetime play statistics of one device.
///
/// Stored payloads from older shapes merge over the defaults field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageLedgerRecord {
    pub total_battles: u64,
    pub today_battles: u64,
    pub today_date: Option<NaiveDate>,
    pub total_wins: u64,
    pub max_score: u32,
    pub perfect_wins: u64,
    pub max_streak: u32,
    pub current_streak: u32,
    pub last_winner: Option<String>,
    pub max_combo: u32,
    pub max_daily_battles: u64,
    pub unique_users: u64,
    pub users_played: BTreeSet<String>,
    pub legends_defeated: BTreeSet<String>,
    pub winners: BTreeMap<String, u64>,
    /// Most recent first.
    pub recent_battles: Vec<RecentBattle>,
    /// Unlock order.
    pub achievements: Vec<AchievementId>,
    pub xp: u64,
    pub level: u32,
    pub page_views: u64,
    pub first_visit: Option<DateTime<Utc>>,
    pub last_visit: Option<DateTime<Utc>>,
}

impl Default for UsageLedgerRecord {
    fn default() -> Self {
        Self {
            total_battles: 0,
            today_battles: 0,
            today_date: None,
            total_wins: 0,
            max_score: 0,
            perfect_wins: 0,
            max_streak: 0,
            current_streak: 0,
            last_winner: None,
            max_combo: 0,
            max_daily_battles: 0,
            unique_users: 0,
            users_played: BTreeSet::new(),
            legends_defeated: BTreeSet::new(),
            winners: BTreeMap::new(),
            recent_battles: Vec::new(),
            achievements: Vec::new(),
            xp: 0,
            level: 1,
            page_views: 0,
            first_visit: None,
            last_visit: None,
        }
    }
}

impl UsageLedgerRecord {
    /// Moves `today_battles` into the daily maximum when `today` differs from
    /// the stored day. Returns whether a rollover happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        match self.today_date {
            Some(date) if date == today => false,
            Some(_) => {
                self.max_daily_battles = self.max_daily_battles.max(self.today_battles);
                self.today_battles = 0;
                self.today_date = Some(today);
                true
            }
            None => {
                self.today_date = Some(today);
                false
            }
        }
    }

    pub fn record_battle(
        &mut self,
        outcome: &BattleOutcome,
        at: DateTime<Utc>,
    ) -> Result<LedgerUpdate, LedgerError> {
        if outcome.player1.trim().is_empty() || outcome.player2.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "both players must be named".to_string(),
            ));
        }
        let winner_is_player1 = match &outcome.winner {
            Some(winner) if winner.eq_ignore_ascii_case(&outcome.player1) => Some(true),
            Some(winner) if winner.eq_ignore_ascii_case(&outcome.player2) => Some(false),
            Some(winner) => {
                return Err(LedgerError::InvalidInput(format!(
                    "winner {winner} did not take part in the battle"
                )))
            }
            None => None,
        };

        self.roll_over(at.date_naive());
        self.total_battles += 1;
        self.today_battles += 1;
        for player in [&outcome.player1, &outcome.player2] {
            self.users_played.insert(player.to_lowercase());
        }
        self.unique_users = self.users_played.len() as u64;

        let mut perfect = false;
        let xp_gained = match winner_is_player1 {
            Some(player1_won) => {
                let (winner, loser, winner_score) = if player1_won {
                    (&outcome.player1, &outcome.player2, outcome.player1_score)
                } else {
                    (&outcome.player2, &outcome.player1, outcome.player2_score)
                };
                let winner = winner.to_lowercase();

                self.total_wins += 1;
                *self.winners.entry(winner.clone()).or_insert(0) += 1;

                self.current_streak =
                    advance_streak(&mut self.last_winner, self.current_streak, winner);
                self.max_streak = self.max_streak.max(self.current_streak);

                self.max_score = self.max_score.max(winner_score);
                if winner_score == PERFECT_SCORE {
                    self.perfect_wins += 1;
                    perfect = true;
                }

                if roster::is_famous(loser) {
                    self.legends_defeated.insert(loser.to_lowercase());
                }

                WIN_BASE_XP
                    + XP_PER_POINT * u64::from(winner_score)
                    + XP_PER_STREAK * u64::from(self.current_streak)
            }
            None => {
                self.current_streak = 0;
                self.last_winner = None;
                TIE_XP
            }
        };
        let levels_gained = self.award_xp(xp_gained);

        self.recent_battles.insert(
            0,
            RecentBattle {
                player1: outcome.player1.clone(),
                player2: outcome.player2.clone(),
                winner: outcome.winner.clone(),
                player1_score: outcome.player1_score,
                player2_score: outcome.player2_score,
                timestamp: at,
            },
        );
        self.recent_battles.truncate(RECENT_BATTLES_CAP);

        let new_achievements = self.check_achievements();

        Ok(LedgerUpdate {
            xp_gained,
            levels_gained,
            xp: self.xp,
            level: self.level,
            current_streak: self.current_streak,
            perfect,
            new_achievements,
        })
    }

    /// Unlocks every achievement whose predicate now holds. Each identifier is
    /// reported at most once over the ledger's lifetime.
    pub fn check_achievements(&mut self) -> Vec<AchievementId> {
        let newly_unlocked: Vec<AchievementId> = ACHIEVEMENTS
            .iter()
            .filter(|a| !self.achievements.contains(&a.id) && a.is_met(self))
            .map(|a| a.id)
            .collect();
        self.achievements.extend(&newly_unlocked);
        newly_unlocked
    }

    pub fn record_combo(&mut self, combo: u32) -> Vec<AchievementId> {
        if combo > self.max_combo {
            self.max_combo = combo;
        }
        self.check_achievements()
    }

    /// Adds XP and levels up as many times as it covers. Returns levels gained.
    pub fn award_xp(&mut self, amount: u64) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= u64::from(self.level) * XP_PER_LEVEL {
            self.level += 1;
            gained += 1;
        }
        gained
    }

    pub fn record_visit(&mut self, at: DateTime<Utc>) {
        self.page_views += 1;
        self.first_visit.get_or_insert(at);
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.first_visit.get_or_insert(at);
        self.last_visit = Some(at);
    }

    /// Win counts sorted by wins, then name.
    pub fn top_winners(&self, limit: usize) -> Vec<WinnerTally> {
        let mut tallies: Vec<_> = self
            .winners
            .iter()
            .map(|(username, wins)| WinnerTally {
                username: username.clone(),
                wins: *wins,
            })
            .collect();
        tallies.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.username.cmp(&b.username)));
        tallies.truncate(limit);
        tallies
    }
}
