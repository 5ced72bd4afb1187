use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Leaderboard unreachable: {0}")]
    Transport(String),

    #[error("Leaderboard responded with an error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for LeaderboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LeaderboardError::Upstream(err.to_string())
        } else {
            LeaderboardError::Transport(err.to_string())
        }
    }
}
