// Public API
pub use category::{BattleCategory, PERFECT_SCORE, STANDARD_CATEGORIES};
pub use errors::BattleError;
pub use resolver::{
    advance_streak, resolve_round, BattlePhase, BattleResult, BattleState, ComboEvent,
    ComboState, RoundComparison, RoundOutcome, RoundWinner, Side, VictoryKind,
};

// Internal modules
mod category;
mod errors;
mod resolver;
