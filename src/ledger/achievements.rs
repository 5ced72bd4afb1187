use serde::{Deserialize, Serialize};

use super::UsageLedgerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstBlood,
    Veteran,
    Champion,
    Dominator,
    Perfectionist,
    StreakMaster,
    LegendSlayer,
    Explorer,
    ComboKing,
    Dedicated,
}

pub struct AchievementDefinition {
    pub id: AchievementId,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: fn(&UsageLedgerRecord) -> bool,
}

impl AchievementDefinition {
    pub fn is_met(&self, ledger: &UsageLedgerRecord) -> bool {
        (self.condition)(ledger)
    }
}

/// Catalog in unlock-evaluation order.
pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: AchievementId::FirstBlood,
        icon: "🩸",
        name: "First Blood",
        description: "Win your first battle",
        condition: |l| l.total_wins >= 1,
    },
    AchievementDefinition {
        id: AchievementId::Veteran,
        icon: "⚔️",
        name: "Veteran",
        description: "Complete 10 battles",
        condition: |l| l.total_battles >= 10,
    },
    AchievementDefinition {
        id: AchievementId::Champion,
        icon: "🏆",
        name: "Champion",
        description: "Win 5 battles",
        condition: |l| l.total_wins >= 5,
    },
    AchievementDefinition {
        id: AchievementId::Dominator,
        icon: "👑",
        name: "Dominator",
        description: "Win with 6+ points",
        condition: |l| l.max_score >= 6,
    },
    AchievementDefinition {
        id: AchievementId::Perfectionist,
        icon: "💎",
        name: "Perfectionist",
        description: "Win 7-0",
        condition: |l| l.perfect_wins >= 1,
    },
    AchievementDefinition {
        id: AchievementId::StreakMaster,
        icon: "🔥",
        name: "On Fire",
        description: "3 win streak",
        condition: |l| l.max_streak >= 3,
    },
    AchievementDefinition {
        id: AchievementId::LegendSlayer,
        icon: "⚡",
        name: "Legend Slayer",
        description: "Beat torvalds",
        condition: |l| l.legends_defeated.contains("torvalds"),
    },
    AchievementDefinition {
        id: AchievementId::Explorer,
        icon: "🌍",
        name: "Explorer",
        description: "Battle 10 unique users",
        condition: |l| l.unique_users >= 10,
    },
    AchievementDefinition {
        id: AchievementId::ComboKing,
        icon: "💥",
        name: "Combo King",
        description: "Get a 4+ combo",
        condition: |l| l.max_combo >= 4,
    },
    AchievementDefinition {
        id: AchievementId::Dedicated,
        icon: "🎮",
        name: "Dedicated",
        description: "5 battles in one day",
        // The daily maximum only rises at rollover, so count today as well.
        condition: |l| l.max_daily_battles.max(l.today_battles) >= 5,
    },
];
