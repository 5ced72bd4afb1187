// Public API
pub use achievements::{AchievementDefinition, AchievementId, ACHIEVEMENTS};
pub use errors::LedgerError;
pub use models::{
    BattleOutcome, LedgerUpdate, RecentBattle, UsageLedgerRecord, WinnerTally,
    DEFAULT_TOP_WINNERS, RECENT_BATTLES_CAP, XP_PER_LEVEL,
};
pub use service::{UsageLedgerService, LEDGER_KEY};

// Internal modules
mod achievements;
mod errors;
mod models;
mod service;
