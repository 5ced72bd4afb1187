use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BattleError {
    #[error("Invalid battle state: {0}")]
    InvalidState(String),
}
