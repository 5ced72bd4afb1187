use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    BattleSubmission, GlobalCounts, LeaderboardClient, LeaderboardEntry, LeaderboardError,
    RecordedBattle, MIN_RANKED_BATTLES, RECENT_BATTLES_SHOWN,
};

#[derive(Debug, Default)]
struct LeaderboardState {
    users: HashMap<String, LeaderboardEntry>,
    /// Oldest first.
    battles: Vec<RecordedBattle>,
}

/// Local stand-in for the leaderboard service with the same contract.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLeaderboard {
    state: Arc<RwLock<LeaderboardState>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

fn win_rate(wins: u64, total_battles: u64) -> f64 {
    if total_battles == 0 {
        return 0.0;
    }
    (wins as f64 / total_battles as f64 * 1000.0).round() / 10.0
}

fn upsert(
    users: &mut HashMap<String, LeaderboardEntry>,
    username: String,
    score: u32,
    won: bool,
    lost: bool,
) {
    let entry = users
        .entry(username.clone())
        .or_insert_with(|| LeaderboardEntry {
            github_username: username,
            total_battles: 0,
            wins: 0,
            losses: 0,
            highest_score: 0,
            win_rate: 0.0,
        });
    entry.total_battles += 1;
    entry.wins += u64::from(won);
    entry.losses += u64::from(lost);
    entry.highest_score = entry.highest_score.max(score);
    entry.win_rate = win_rate(entry.wins, entry.total_battles);
}

#[async_trait]
impl LeaderboardClient for InMemoryLeaderboard {
    async fn record_battle(&self, submission: &BattleSubmission) -> Result<(), LeaderboardError> {
        submission.validate()?;

        let player1 = submission.player1.to_lowercase();
        let player2 = submission.player2.to_lowercase();
        let player1_won = submission.winner_is(&player1);
        let player2_won = submission.winner_is(&player2);

        let mut state = self.state.write().await;
        state.battles.push(RecordedBattle {
            player1: player1.clone(),
            player2: player2.clone(),
            player1_score: submission.scores.p1,
            player2_score: submission.scores.p2,
            winner: submission.winner.as_ref().map(|w| w.to_lowercase()),
            created_at: Some(Utc::now()),
        });
        upsert(
            &mut state.users,
            player1,
            submission.scores.p1,
            player1_won,
            player2_won,
        );
        upsert(
            &mut state.users,
            player2,
            submission.scores.p2,
            player2_won,
            player1_won,
        );

        debug!(battles = state.battles.len(), "Battle recorded locally");
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let state = self.state.read().await;
        let mut ranked: Vec<_> = state
            .users
            .values()
            .filter(|entry| entry.total_battles >= MIN_RANKED_BATTLES)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.win_rate.total_cmp(&a.win_rate))
                .then_with(|| b.total_battles.cmp(&a.total_battles))
                .then_with(|| a.github_username.cmp(&b.github_username))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn global_counts(&self) -> Result<GlobalCounts, LeaderboardError> {
        let state = self.state.read().await;
        Ok(GlobalCounts {
            total_users: state.users.len() as u64,
            total_battles: state.battles.len() as u64,
            recent_battles: state
                .battles
                .iter()
                .rev()
                .take(RECENT_BATTLES_SHOWN)
                .cloned()
                .collect(),
        })
    }
}
