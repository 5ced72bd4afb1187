use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    AchievementStatus, BattleReport, DailyBattleReport, FighterCard, TeamBattleReport, TeamSide,
};
use crate::battle::{BattleCategory, BattleState, Side, STANDARD_CATEGORIES};
use crate::daily::{DailyChallengeRecord, DailyChallengeService, DailySummary, DAILY_XP};
use crate::github::ProfileSource;
use crate::leaderboard::{
    BattleSubmission, GlobalCounts, LeaderboardClient, LeaderboardEntry, Scores,
};
use crate::ledger::{
    BattleOutcome, UsageLedgerRecord, UsageLedgerService, WinnerTally, ACHIEVEMENTS,
};
use crate::roster;
use crate::shared::AppError;
use crate::stats::{aggregate, team_power};
use crate::store::KeyValueStore;

pub const MIN_TEAM_SIZE: usize = 2;
pub const MAX_TEAM_SIZE: usize = 3;

/// Runs battles end to end: fetch both sides, resolve every round, update
/// the usage ledger and hand the result to the leaderboard.
pub struct ArenaService {
    profiles: Arc<dyn ProfileSource>,
    ledger: UsageLedgerService,
    daily: DailyChallengeService,
    leaderboard: Option<Arc<dyn LeaderboardClient>>,
    categories: Vec<BattleCategory>,
}

impl ArenaService {
    pub fn builder(
        profiles: Arc<dyn ProfileSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> ArenaServiceBuilder {
        ArenaServiceBuilder::new(profiles, store)
    }

    pub fn categories(&self) -> &[BattleCategory] {
        &self.categories
    }

    #[instrument(skip(self))]
    pub async fn fighter_card(&self, username: &str) -> Result<FighterCard, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::InvalidInput(
                "Please enter a GitHub username".to_string(),
            ));
        }

        let (profile, repos) = tokio::try_join!(
            self.profiles.fetch_profile(username),
            self.profiles.fetch_repositories(username)
        )?;
        debug!(username, repo_count = repos.len(), "Fighter data loaded");

        Ok(FighterCard::build(profile, &repos)?)
    }

    #[instrument(skip(self))]
    pub async fn battle(
        &self,
        player1: &str,
        player2: &str,
        now: DateTime<Utc>,
    ) -> Result<BattleReport, AppError> {
        let (player1, player2) = (player1.trim(), player2.trim());
        if player1.is_empty() || player2.is_empty() {
            return Err(AppError::InvalidInput(
                "Please enter both GitHub usernames".to_string(),
            ));
        }
        if player1.eq_ignore_ascii_case(player2) {
            return Err(AppError::InvalidInput(
                "A fighter cannot battle themselves".to_string(),
            ));
        }

        let (card1, card2) =
            tokio::try_join!(self.fighter_card(player1), self.fighter_card(player2))?;
        self.run_battle(card1, card2, now).await
    }

    /// Battles `player` against a random famous developer.
    #[instrument(skip(self))]
    pub async fn random_battle(
        &self,
        player: &str,
        now: DateTime<Utc>,
    ) -> Result<BattleReport, AppError> {
        let opponent = roster::random_opponent(player.trim());
        info!(player, opponent, "Random opponent drawn");
        self.battle(player, opponent, now).await
    }

    async fn run_battle(
        &self,
        card1: FighterCard,
        card2: FighterCard,
        now: DateTime<Utc>,
    ) -> Result<BattleReport, AppError> {
        let mut state = BattleState::new(
            card1.login(),
            card1.statistics.clone(),
            card2.login(),
            card2.statistics.clone(),
            &self.categories,
        )?;
        let result = state.run()?;
        let rounds = state.rounds().to_vec();

        let combos: Vec<u32> = rounds
            .iter()
            .filter(|round| round.combo.combo)
            .map(|round| round.combo.streak)
            .collect();
        let winner = result.winner.side().map(|side| match side {
            Side::Player1 => state.player1().to_string(),
            Side::Player2 => state.player2().to_string(),
        });
        let outcome = BattleOutcome {
            player1: state.player1().to_string(),
            player2: state.player2().to_string(),
            winner: winner.clone(),
            player1_score: result.player1_score,
            player2_score: result.player2_score,
        };

        let (ledger, update) = self.ledger.record_battle(&outcome, &combos, now).await?;
        info!(
            player1 = %outcome.player1,
            player2 = %outcome.player2,
            winner = winner.as_deref().unwrap_or("TIE"),
            score = %format!("{}-{}", result.player1_score, result.player2_score),
            streak = ledger.current_streak,
            xp = ledger.xp,
            level = ledger.level,
            "Battle complete"
        );

        let leaderboard_forwarded = self.forward_to_leaderboard(&outcome);

        Ok(BattleReport {
            battle_id: Uuid::new_v4(),
            player1: card1,
            player2: card2,
            rounds,
            result,
            winner,
            ledger: update,
            leaderboard_forwarded,
        })
    }

    /// Schedules a best-effort write to the leaderboard. Returns whether a
    /// write was scheduled; its outcome is only logged.
    fn forward_to_leaderboard(&self, outcome: &BattleOutcome) -> bool {
        let Some(client) = self.leaderboard.clone() else {
            return false;
        };

        let submission = match BattleSubmission::new(
            outcome.player1.clone(),
            outcome.player2.clone(),
            Scores {
                p1: outcome.player1_score,
                p2: outcome.player2_score,
            },
            outcome.winner.clone(),
        ) {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Battle not eligible for the leaderboard");
                return false;
            }
        };

        tokio::spawn(async move {
            if let Err(e) = client.record_battle(&submission).await {
                warn!(error = %e, "Failed to forward battle to leaderboard");
            }
        });
        true
    }

    #[instrument(skip(self))]
    pub async fn team_battle(
        &self,
        alpha: &[String],
        beta: &[String],
    ) -> Result<TeamBattleReport, AppError> {
        validate_teams(alpha, beta)?;

        let (alpha_cards, beta_cards) = tokio::try_join!(
            try_join_all(alpha.iter().map(|member| self.fighter_card(member))),
            try_join_all(beta.iter().map(|member| self.fighter_card(member)))
        )?;

        let alpha = team_side(alpha_cards)?;
        let beta = team_side(beta_cards)?;

        let mut state = BattleState::new(
            "alpha",
            alpha.statistics.statistics.clone(),
            "beta",
            beta.statistics.statistics.clone(),
            &STANDARD_CATEGORIES,
        )?;
        let result = state.run()?;
        info!(
            alpha_power = alpha.power,
            beta_power = beta.power,
            score = %format!("{}-{}", result.player1_score, result.player2_score),
            "Team battle complete"
        );

        Ok(TeamBattleReport {
            battle_id: Uuid::new_v4(),
            rounds: state.rounds().to_vec(),
            alpha,
            beta,
            result,
        })
    }

    pub async fn daily_challenge(&self, today: NaiveDate) -> DailyChallengeRecord {
        self.daily.current_challenge(today).await
    }

    /// Fights today's pairing and completes the challenge. The daily bonus is
    /// credited to the ledger on the first completion only.
    #[instrument(skip(self))]
    pub async fn daily_battle(&self, now: DateTime<Utc>) -> Result<DailyBattleReport, AppError> {
        let today = now.date_naive();
        let challenge = self.daily.current_challenge(today).await;

        let (card1, card2) = tokio::try_join!(
            self.fighter_card(&challenge.player1),
            self.fighter_card(&challenge.player2)
        )?;
        let battle = self.run_battle(card1, card2, now).await?;

        let daily = self
            .daily
            .complete_challenge(today, battle.result.winner.into())
            .await;
        let daily_xp_awarded = if daily.already_completed {
            0
        } else {
            self.ledger.award_xp(DAILY_XP, now).await?;
            DAILY_XP
        };

        Ok(DailyBattleReport {
            battle,
            daily,
            daily_xp_awarded,
        })
    }

    pub async fn daily_summary(&self, today: NaiveDate) -> DailySummary {
        self.daily.summary(today).await
    }

    pub async fn ledger(&self, now: DateTime<Utc>) -> UsageLedgerRecord {
        self.ledger.load(now).await
    }

    pub async fn record_visit(&self, now: DateTime<Utc>) -> Result<UsageLedgerRecord, AppError> {
        Ok(self.ledger.record_visit(now).await?)
    }

    pub async fn clear_ledger(&self) -> Result<(), AppError> {
        Ok(self.ledger.clear().await?)
    }

    pub async fn top_winners(&self, limit: usize, now: DateTime<Utc>) -> Vec<WinnerTally> {
        self.ledger.top_winners(limit, now).await
    }

    pub async fn achievements(&self, now: DateTime<Utc>) -> Vec<AchievementStatus> {
        let ledger = self.ledger.load(now).await;
        ACHIEVEMENTS
            .iter()
            .map(|definition| {
                AchievementStatus::new(definition, ledger.achievements.contains(&definition.id))
            })
            .collect()
    }

    /// Remote top-N; empty when no leaderboard is configured.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AppError> {
        match &self.leaderboard {
            Some(client) => Ok(client.top(limit).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn leaderboard_counts(&self) -> Result<GlobalCounts, AppError> {
        match &self.leaderboard {
            Some(client) => Ok(client.global_counts().await?),
            None => Ok(GlobalCounts::default()),
        }
    }
}

fn validate_teams(alpha: &[String], beta: &[String]) -> Result<(), AppError> {
    for team in [alpha, beta] {
        if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team.len()) {
            return Err(AppError::InvalidInput(format!(
                "Teams need {MIN_TEAM_SIZE} to {MAX_TEAM_SIZE} members"
            )));
        }
    }
    if alpha.len() != beta.len() {
        return Err(AppError::InvalidInput(
            "Both teams need the same number of members".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for member in alpha.iter().chain(beta) {
        let member = member.trim();
        if member.is_empty() {
            return Err(AppError::InvalidInput(
                "Every team member needs a username".to_string(),
            ));
        }
        if !seen.insert(member.to_lowercase()) {
            return Err(AppError::InvalidInput(format!(
                "{member} appears more than once"
            )));
        }
    }
    Ok(())
}

fn team_side(members: Vec<FighterCard>) -> Result<TeamSide, AppError> {
    let member_stats: Vec<_> = members.iter().map(|m| m.statistics.clone()).collect();
    let statistics = aggregate(&member_stats)?;

    Ok(TeamSide {
        power: team_power(&statistics),
        members,
        statistics,
    })
}

pub struct ArenaServiceBuilder {
    profiles: Arc<dyn ProfileSource>,
    store: Arc<dyn KeyValueStore>,
    leaderboard: Option<Arc<dyn LeaderboardClient>>,
    categories: Vec<BattleCategory>,
}

impl ArenaServiceBuilder {
    fn new(profiles: Arc<dyn ProfileSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            profiles,
            store,
            leaderboard: None,
            categories: STANDARD_CATEGORIES.to_vec(),
        }
    }

    pub fn with_leaderboard(mut self, leaderboard: Arc<dyn LeaderboardClient>) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    pub fn with_categories(mut self, categories: Vec<BattleCategory>) -> Self {
        if !categories.is_empty() {
            self.categories = categories;
        }
        self
    }

    pub fn build(self) -> ArenaService {
        ArenaService {
            profiles: self.profiles,
            ledger: UsageLedgerService::new(Arc::clone(&self.store)),
            daily: DailyChallengeService::new(self.store),
            leaderboard: self.leaderboard,
            categories: self.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::RoundWinner;
    use crate::leaderboard::InMemoryLeaderboard;
    use crate::ledger::AchievementId;
    use crate::shared::test_utils::StaticProfileSource;
    use crate::store::InMemoryKeyValueStore;
    use chrono::TimeZone;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 18, 30, 0).unwrap()
    }

    fn profiles() -> StaticProfileSource {
        StaticProfileSource::new()
            .with_fighter("heavyweight", 5000, 40, 200)
            .with_fighter("rookie", 1, 1, 0)
            .with_fighter("middle", 300, 10, 20)
            .with_fighter("torvalds", 200_000, 8, 20_000)
            .with_fighter("alpha1", 50, 5, 10)
            .with_fighter("alpha2", 60, 6, 12)
            .with_fighter("beta1", 1, 1, 1)
            .with_fighter("beta2", 2, 1, 1)
    }

    fn service() -> ArenaService {
        ArenaService::builder(
            Arc::new(profiles()),
            Arc::new(InMemoryKeyValueStore::new()),
        )
        .build()
    }

    #[tokio::test]
    async fn battle_updates_ledger_and_reports_rounds() {
        let arena = service();
        let report = arena.battle("heavyweight", "rookie", now()).await.unwrap();

        assert_eq!(report.rounds.len(), STANDARD_CATEGORIES.len());
        assert_eq!(report.result.winner, RoundWinner::Player1);
        assert_eq!(report.winner.as_deref(), Some("heavyweight"));
        assert!(report.ledger.new_achievements.contains(&AchievementId::FirstBlood));
        assert!(!report.leaderboard_forwarded);

        let ledger = arena.ledger(now()).await;
        assert_eq!(ledger.total_battles, 1);
        assert_eq!(ledger.winners.get("heavyweight"), Some(&1));
    }

    #[tokio::test]
    async fn combo_rounds_reach_the_ledger() {
        let arena = service();
        let report = arena.battle("heavyweight", "rookie", now()).await.unwrap();
        let best_streak = report.rounds.iter().map(|r| r.combo.streak).max().unwrap();

        assert!(best_streak >= 4);
        assert_eq!(arena.ledger(now()).await.max_combo, best_streak);
        assert!(report.ledger.new_achievements.contains(&AchievementId::ComboKing));
    }

    #[tokio::test]
    async fn self_battle_is_rejected() {
        let arena = service();
        let err = arena.battle("Middle", "middle", now()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(arena.ledger(now()).await.total_battles, 0);
    }

    #[tokio::test]
    async fn unknown_fighter_stops_the_battle() {
        let arena = service();
        let err = arena.battle("middle", "nobody-here", now()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(arena.ledger(now()).await.total_battles, 0);
    }

    #[tokio::test]
    async fn beating_torvalds_unlocks_legend_slayer() {
        let arena = ArenaService::builder(
            Arc::new(profiles().with_fighter("giant", 900_000, 90, 90_000)),
            Arc::new(InMemoryKeyValueStore::new()),
        )
        .build();

        let report = arena.battle("giant", "torvalds", now()).await.unwrap();
        assert_eq!(report.winner.as_deref(), Some("giant"));
        assert!(report
            .ledger
            .new_achievements
            .contains(&AchievementId::LegendSlayer));
    }

    #[tokio::test]
    async fn results_are_forwarded_to_leaderboard() {
        let board = Arc::new(InMemoryLeaderboard::new());
        let arena = ArenaService::builder(
            Arc::new(profiles()),
            Arc::new(InMemoryKeyValueStore::new()),
        )
        .with_leaderboard(board.clone())
        .build();

        let report = arena.battle("heavyweight", "rookie", now()).await.unwrap();
        assert!(report.leaderboard_forwarded);

        let mut recorded = 0;
        for _ in 0..50 {
            recorded = board.global_counts().await.unwrap().total_battles;
            if recorded == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(recorded, 1);
    }

    #[tokio::test]
    async fn team_battle_aggregates_members() {
        let arena = service();
        let report = arena
            .team_battle(
                &["alpha1".to_string(), "alpha2".to_string()],
                &["beta1".to_string(), "beta2".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(report.alpha.statistics.members, 2);
        assert_eq!(report.alpha.statistics.statistics.stars, 50 + 72);
        assert_eq!(report.result.winner, RoundWinner::Player1);
        assert!(report.alpha.power > report.beta.power);
        // Team battles leave the ledger alone.
        assert_eq!(arena.ledger(now()).await.total_battles, 0);
    }

    #[tokio::test]
    async fn team_shapes_are_validated() {
        let arena = service();
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        for (alpha, beta) in [
            (names(&["alpha1"]), names(&["beta1"])),
            (names(&["alpha1", "alpha2"]), names(&["beta1", "beta2", "middle"])),
            (names(&["alpha1", "ALPHA1"]), names(&["beta1", "beta2"])),
            (names(&["alpha1", "alpha2"]), names(&["beta1", "alpha2"])),
        ] {
            assert!(matches!(
                arena.team_battle(&alpha, &beta).await,
                Err(AppError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn random_battle_picks_a_famous_opponent() {
        let source = roster::FAMOUS_DEVS
            .iter()
            .fold(profiles(), |source, dev| source.with_fighter(dev, 10, 2, 3));
        let arena = ArenaService::builder(
            Arc::new(source),
            Arc::new(InMemoryKeyValueStore::new()),
        )
        .build();

        let report = arena.random_battle("middle", now()).await.unwrap();
        assert_eq!(report.player1.login(), "middle");
        assert!(roster::is_famous(report.player2.login()));
    }

    #[tokio::test]
    async fn achievements_list_the_whole_catalog() {
        let arena = service();
        arena.battle("heavyweight", "rookie", now()).await.unwrap();

        let achievements = arena.achievements(now()).await;
        assert_eq!(achievements.len(), ACHIEVEMENTS.len());
        assert!(achievements
            .iter()
            .any(|a| a.id == AchievementId::FirstBlood && a.unlocked));
        assert!(achievements
            .iter()
            .any(|a| a.id == AchievementId::Explorer && !a.unlocked));
    }

    #[tokio::test]
    async fn leaderboard_reads_are_empty_without_a_client() {
        let arena = service();
        assert!(arena.leaderboard(10).await.unwrap().is_empty());
        assert_eq!(arena.leaderboard_counts().await.unwrap(), GlobalCounts::default());
    }
}
