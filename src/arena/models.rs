use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::battle::{BattleResult, RoundOutcome};
use crate::daily::DailyCompletion;
use crate::github::{ProfileRecord, RepositorySummary};
use crate::ledger::{AchievementDefinition, AchievementId, LedgerUpdate};
use crate::stats::{
    compute_preview_power, compute_statistics, pick_title, power_from_statistics, Rank,
    StatisticsRecord, StatsError, TeamStatisticsRecord,
};

/// Everything needed to preview a fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterCard {
    pub profile: ProfileRecord,
    pub statistics: StatisticsRecord,
    /// Weighted power used for battles.
    pub power: u32,
    /// Logarithmic power used for the preview rank.
    pub preview_power: f64,
    pub rank: Rank,
    pub title: String,
}

impl FighterCard {
    pub fn build(
        profile: ProfileRecord,
        repos: &[RepositorySummary],
    ) -> Result<FighterCard, StatsError> {
        let statistics = compute_statistics(&profile, repos)?;
        let preview_power = compute_preview_power(&profile, repos)?;

        Ok(FighterCard {
            power: power_from_statistics(&statistics),
            rank: Rank::for_power(preview_power),
            title: pick_title(&statistics).to_string(),
            preview_power,
            statistics,
            profile,
        })
    }

    pub fn login(&self) -> &str {
        &self.profile.login
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BattleRequest {
    pub player1: String,
    pub player2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomBattleRequest {
    pub player: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamBattleRequest {
    pub alpha: Vec<String>,
    pub beta: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub battle_id: Uuid,
    pub player1: FighterCard,
    pub player2: FighterCard,
    pub rounds: Vec<RoundOutcome>,
    pub result: BattleResult,
    /// Login of the winner; `None` on a tie.
    pub winner: Option<String>,
    pub ledger: LedgerUpdate,
    pub leaderboard_forwarded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSide {
    pub members: Vec<FighterCard>,
    pub statistics: TeamStatisticsRecord,
    pub power: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamBattleReport {
    pub battle_id: Uuid,
    pub alpha: TeamSide,
    pub beta: TeamSide,
    pub rounds: Vec<RoundOutcome>,
    pub result: BattleResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBattleReport {
    pub battle: BattleReport,
    pub daily: DailyCompletion,
    /// Daily bonus credited to the usage ledger by this request.
    pub daily_xp_awarded: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub icon: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
}

impl AchievementStatus {
    pub fn new(definition: &AchievementDefinition, unlocked: bool) -> Self {
        Self {
            id: definition.id,
            icon: definition.icon.to_string(),
            name: definition.name.to_string(),
            description: definition.description.to_string(),
            unlocked,
        }
    }
}
