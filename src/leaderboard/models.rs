use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::LeaderboardError;

pub const MAX_HANDLE_LEN: usize = 39;
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 100;
pub const MIN_RANKED_BATTLES: u64 = 3;
pub const RECENT_BATTLES_SHOWN: usize = 10;

/// Checks a GitHub-style handle: ASCII alphanumerics with single interior
/// hyphens, 1 to 39 characters.
pub fn validate_handle(handle: &str) -> Result<(), LeaderboardError> {
    let bytes = handle.as_bytes();
    let valid = !bytes.is_empty()
        && bytes.len() <= MAX_HANDLE_LEN
        && bytes[0].is_ascii_alphanumeric()
        && bytes.iter().enumerate().all(|(i, b)| match b {
            b'-' => bytes
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_alphanumeric()),
            b => b.is_ascii_alphanumeric(),
        });

    if valid {
        Ok(())
    } else {
        Err(LeaderboardError::InvalidInput(format!(
            "Invalid GitHub username format: {handle:?}"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub p1: u32,
    pub p2: u32,
}

/// Request body of a battle write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSubmission {
    pub player1: String,
    pub player2: String,
    pub scores: Scores,
    pub winner: Option<String>,
}

impl BattleSubmission {
    pub fn new(
        player1: impl Into<String>,
        player2: impl Into<String>,
        scores: Scores,
        winner: Option<String>,
    ) -> Result<Self, LeaderboardError> {
        let submission = Self {
            player1: player1.into(),
            player2: player2.into(),
            scores,
            winner,
        };
        submission.validate()?;
        Ok(submission)
    }

    pub fn validate(&self) -> Result<(), LeaderboardError> {
        validate_handle(&self.player1)?;
        validate_handle(&self.player2)?;
        Ok(())
    }

    pub(crate) fn winner_is(&self, player: &str) -> bool {
        self.winner
            .as_deref()
            .is_some_and(|winner| winner.eq_ignore_ascii_case(player))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub github_username: String,
    pub total_battles: u64,
    pub wins: u64,
    pub losses: u64,
    pub highest_score: u32,
    /// Percent, one decimal.
    #[serde(default, deserialize_with = "number_or_string")]
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedBattle {
    pub player1: String,
    pub player2: String,
    pub player1_score: u32,
    pub player2_score: u32,
    pub winner: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalCounts {
    pub total_users: u64,
    pub total_battles: u64,
    #[serde(default)]
    pub recent_battles: Vec<RecordedBattle>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardEnvelope {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    pub stats: GlobalCounts,
}

/// SQL numerics arrive as JSON strings from some drivers.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("win_rate is not representable")),
        Value::String(s) => s.trim().parse().map_err(de::Error::custom),
        Value::Null => Ok(0.0),
        other => Err(de::Error::custom(format!("unexpected win_rate: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("a")]
    #[case("octocat")]
    #[case("patak-dev")]
    #[case("a-b-c")]
    #[case("A1")]
    #[case("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx")]
    fn accepts_valid_handles(#[case] handle: &str) {
        assert!(validate_handle(handle).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("-leading")]
    #[case("trailing-")]
    #[case("double--hyphen")]
    #[case("under_score")]
    #[case("sp ace")]
    #[case("ünïcode")]
    #[case("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx")]
    fn rejects_invalid_handles(#[case] handle: &str) {
        assert!(matches!(
            validate_handle(handle),
            Err(LeaderboardError::InvalidInput(_))
        ));
    }

    #[test]
    fn submission_serializes_in_wire_shape() {
        let submission = BattleSubmission::new(
            "alice",
            "bob",
            Scores { p1: 5, p2: 2 },
            Some("alice".to_string()),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({
                "player1": "alice",
                "player2": "bob",
                "scores": {"p1": 5, "p2": 2},
                "winner": "alice"
            })
        );
        assert!(submission.winner_is("ALICE"));
        assert!(!submission.winner_is("bob"));
    }

    #[test]
    fn submission_rejects_bad_handle() {
        assert!(BattleSubmission::new("ok", "not ok", Scores { p1: 1, p2: 1 }, None).is_err());
    }

    #[test]
    fn win_rate_accepts_numeric_strings() {
        let entries: LeaderboardEnvelope = serde_json::from_value(json!({
            "success": true,
            "leaderboard": [
                {"github_username": "a", "total_battles": 4, "wins": 3, "losses": 1, "highest_score": 7, "win_rate": "75.0"},
                {"github_username": "b", "total_battles": 3, "wins": 1, "losses": 2, "highest_score": 4, "win_rate": 33.3},
                {"github_username": "c", "total_battles": 3, "wins": 0, "losses": 0, "highest_score": 4, "win_rate": null}
            ]
        }))
        .unwrap();

        let rates: Vec<_> = entries.leaderboard.iter().map(|e| e.win_rate).collect();
        assert_eq!(rates, vec![75.0, 33.3, 0.0]);
    }

    #[test]
    fn stats_envelope_decodes_counts_and_recent_battles() {
        let envelope: StatsEnvelope = serde_json::from_value(json!({
            "success": true,
            "stats": {
                "total_users": 12,
                "total_battles": 40,
                "recent_battles": [
                    {"player1": "torvalds", "player2": "gaearon", "player1_score": 5, "player2_score": 2,
                     "winner": "torvalds", "created_at": "2024-05-04T10:00:00Z"},
                    {"player1": "a", "player2": "b", "player1_score": 7, "player2_score": 7, "winner": null}
                ]
            }
        }))
        .unwrap();

        let stats = envelope.stats;
        assert_eq!((stats.total_users, stats.total_battles), (12, 40));
        assert_eq!(stats.recent_battles.len(), 2);
        assert_eq!(stats.recent_battles[0].winner.as_deref(), Some("torvalds"));
        assert!(stats.recent_battles[0].created_at.is_some());
        assert_eq!(stats.recent_battles[1].winner, None);
        assert_eq!(stats.recent_battles[1].created_at, None);
    }

    #[test]
    fn envelopes_tolerate_missing_lists() {
        let stats: StatsEnvelope =
            serde_json::from_value(json!({"stats": {"total_users": 0, "total_battles": 0}})).unwrap();
        assert_eq!(stats.stats, GlobalCounts::default());

        let board: LeaderboardEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(board.leaderboard.is_empty());

        assert!(serde_json::from_value::<StatsEnvelope>(json!({"success": true})).is_err());
    }
}
