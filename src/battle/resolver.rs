use serde::{Deserialize, Serialize};

use super::{BattleCategory, BattleError, PERFECT_SCORE};
use crate::stats::StatisticsRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player1,
    Player2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundWinner {
    Player1,
    Player2,
    Tie,
}

impl From<Side> for RoundWinner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player1 => RoundWinner::Player1,
            Side::Player2 => RoundWinner::Player2,
        }
    }
}

impl RoundWinner {
    pub fn side(&self) -> Option<Side> {
        match self {
            RoundWinner::Player1 => Some(Side::Player1),
            RoundWinner::Player2 => Some(Side::Player2),
            RoundWinner::Tie => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundComparison {
    pub winner: RoundWinner,
    pub value_a: f64,
    pub value_b: f64,
}

/// Strict comparison of one category. Equal values tie.
pub fn resolve_round(
    category: BattleCategory,
    a: &StatisticsRecord,
    b: &StatisticsRecord,
) -> RoundComparison {
    let value_a = category.value(a);
    let value_b = category.value(b);
    let winner = if value_a > value_b {
        RoundWinner::Player1
    } else if value_b > value_a {
        RoundWinner::Player2
    } else {
        RoundWinner::Tie
    };

    RoundComparison {
        winner,
        value_a,
        value_b,
    }
}

/// Same winner as last time extends the streak, anyone else starts a new one.
pub fn advance_streak<T: PartialEq>(last_winner: &mut Option<T>, streak: u32, winner: T) -> u32 {
    let next = if last_winner.as_ref() == Some(&winner) {
        streak + 1
    } else {
        1
    };
    *last_winner = Some(winner);
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboEvent {
    pub streak: u32,
    pub combo: bool,
    pub critical: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboState {
    pub streak: u32,
    pub last_winner: Option<Side>,
}

impl ComboState {
    pub fn register(&mut self, winner: RoundWinner) -> ComboEvent {
        match winner.side() {
            Some(side) => self.streak = advance_streak(&mut self.last_winner, self.streak, side),
            None => {
                self.streak = 0;
                self.last_winner = None;
            }
        }

        ComboEvent {
            streak: self.streak,
            combo: self.streak >= 2,
            critical: self.streak >= 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "round", rename_all = "snake_case")]
pub enum BattlePhase {
    NotStarted,
    RoundInProgress(usize),
    RoundResolved(usize),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// 1-based.
    pub round: usize,
    pub category: BattleCategory,
    pub label: String,
    pub value_a: f64,
    pub value_b: f64,
    pub formatted_a: String,
    pub formatted_b: String,
    pub winner: RoundWinner,
    pub player1_score: u32,
    pub player2_score: u32,
    pub combo: ComboEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryKind {
    Flawless,
    Dominant,
    Close,
    Draw,
}

impl VictoryKind {
    pub fn from_scores(player1_score: u32, player2_score: u32) -> VictoryKind {
        match player1_score.abs_diff(player2_score) {
            0 => VictoryKind::Draw,
            margin if margin >= 6 => VictoryKind::Flawless,
            margin if margin <= 1 => VictoryKind::Close,
            _ => VictoryKind::Dominant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: RoundWinner,
    pub player1_score: u32,
    pub player2_score: u32,
    pub victory: VictoryKind,
    pub player1_health: f64,
    pub player2_health: f64,
    pub perfect: bool,
}

impl BattleResult {
    pub fn from_scores(player1_score: u32, player2_score: u32) -> Self {
        let winner = if player1_score > player2_score {
            RoundWinner::Player1
        } else if player2_score > player1_score {
            RoundWinner::Player2
        } else {
            RoundWinner::Tie
        };
        let mut result = Self {
            winner,
            player1_score,
            player2_score,
            victory: VictoryKind::from_scores(player1_score, player2_score),
            player1_health: health_after(player2_score),
            player2_health: health_after(player1_score),
            perfect: false,
        };
        result.perfect = result.winning_score() == Some(PERFECT_SCORE);
        result
    }

    pub fn winning_score(&self) -> Option<u32> {
        match self.winner {
            RoundWinner::Player1 => Some(self.player1_score),
            RoundWinner::Player2 => Some(self.player2_score),
            RoundWinner::Tie => None,
        }
    }
}

fn health_after(opponent_score: u32) -> f64 {
    (100.0 - opponent_score as f64 / PERFECT_SCORE as f64 * 100.0).max(0.0)
}

/// One battle between two statistics records over a fixed category order.
///
/// Rounds are strictly sequential: `begin_round` opens the next category and
/// `resolve_round` must then be called with exactly that category.
#[derive(Debug, Clone)]
pub struct BattleState {
    player1: String,
    player2: String,
    stats1: StatisticsRecord,
    stats2: StatisticsRecord,
    categories: Vec<BattleCategory>,
    player1_score: u32,
    player2_score: u32,
    combo: ComboState,
    phase: BattlePhase,
    rounds: Vec<RoundOutcome>,
}

impl BattleState {
    pub fn new(
        player1: impl Into<String>,
        stats1: StatisticsRecord,
        player2: impl Into<String>,
        stats2: StatisticsRecord,
        categories: &[BattleCategory],
    ) -> Result<Self, BattleError> {
        if categories.is_empty() {
            return Err(BattleError::InvalidState(
                "a battle needs at least one category".to_string(),
            ));
        }

        Ok(Self {
            player1: player1.into(),
            player2: player2.into(),
            stats1,
            stats2,
            categories: categories.to_vec(),
            player1_score: 0,
            player2_score: 0,
            combo: ComboState::default(),
            phase: BattlePhase::NotStarted,
            rounds: Vec::with_capacity(categories.len()),
        })
    }

    pub fn player1(&self) -> &str {
        &self.player1
    }

    pub fn player2(&self) -> &str {
        &self.player2
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.player1_score, self.player2_score)
    }

    pub fn combo(&self) -> &ComboState {
        &self.combo
    }

    pub fn rounds(&self) -> &[RoundOutcome] {
        &self.rounds
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    /// Opens the next round and returns the category to resolve.
    pub fn begin_round(&mut self) -> Result<BattleCategory, BattleError> {
        let next = match self.phase {
            BattlePhase::NotStarted => 0,
            BattlePhase::RoundResolved(index) => index + 1,
            BattlePhase::RoundInProgress(index) => {
                return Err(BattleError::InvalidState(format!(
                    "round {} is still in progress",
                    index + 1
                )))
            }
            BattlePhase::Finished => {
                return Err(BattleError::InvalidState(
                    "battle is already finished".to_string(),
                ))
            }
        };

        self.phase = BattlePhase::RoundInProgress(next);
        Ok(self.categories[next])
    }

    pub fn resolve_round(&mut self, category: BattleCategory) -> Result<&RoundOutcome, BattleError> {
        let index = match self.phase {
            BattlePhase::RoundInProgress(index) => index,
            BattlePhase::Finished => {
                return Err(BattleError::InvalidState(
                    "battle is already finished".to_string(),
                ))
            }
            _ => {
                return Err(BattleError::InvalidState(
                    "no round is in progress".to_string(),
                ))
            }
        };

        let expected = self.categories[index];
        if category != expected {
            return Err(BattleError::InvalidState(format!(
                "expected category {} but got {}",
                expected.key(),
                category.key()
            )));
        }

        let comparison = resolve_round(category, &self.stats1, &self.stats2);
        match comparison.winner {
            RoundWinner::Player1 => self.player1_score += 1,
            RoundWinner::Player2 => self.player2_score += 1,
            RoundWinner::Tie => {
                self.player1_score += 1;
                self.player2_score += 1;
            }
        }
        let combo = self.combo.register(comparison.winner);

        self.rounds.push(RoundOutcome {
            round: index + 1,
            category,
            label: category.label().to_string(),
            value_a: comparison.value_a,
            value_b: comparison.value_b,
            formatted_a: category.format(comparison.value_a),
            formatted_b: category.format(comparison.value_b),
            winner: comparison.winner,
            player1_score: self.player1_score,
            player2_score: self.player2_score,
            combo,
        });

        self.phase = if index + 1 == self.categories.len() {
            BattlePhase::Finished
        } else {
            BattlePhase::RoundResolved(index)
        };

        self.rounds
            .last()
            .ok_or_else(|| BattleError::InvalidState("round was not recorded".to_string()))
    }

    pub fn play_next_round(&mut self) -> Result<RoundOutcome, BattleError> {
        let category = self.begin_round()?;
        self.resolve_round(category).cloned()
    }

    /// Plays every remaining round and returns the final result.
    pub fn run(&mut self) -> Result<BattleResult, BattleError> {
        while !self.is_finished() {
            self.play_next_round()?;
        }
        self.finalize()
    }

    pub fn finalize(&self) -> Result<BattleResult, BattleError> {
        if !self.is_finished() {
            return Err(BattleError::InvalidState(format!(
                "battle cannot be finalized in phase {:?}",
                self.phase
            )));
        }
        Ok(BattleResult::from_scores(
            self.player1_score,
            self.player2_score,
        ))
    }
}
