use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::{
    generate, DailyChallengeRecord, DailyCompletion, DailyResult, DailyStats, DailyStreak,
    DailySummary, DAILY_XP,
};
use crate::store::{load_json, save_json, KeyValueStore};

pub const CHALLENGE_KEY: &str = "gitfight.daily.v1";
pub const STATS_KEY: &str = "gitfight.daily_stats.v1";
pub const STREAK_KEY: &str = "gitfight.daily_streak.v1";

/// Daily challenge bookkeeping over the key-value store. Like the usage
/// ledger, reads degrade to defaults and failed writes are only logged.
pub struct DailyChallengeService {
    store: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl DailyChallengeService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    async fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read_optional(key).await.unwrap_or_default()
    }

    async fn read_optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match load_json(self.store.as_ref(), key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key, "Stored daily record unreadable, ignoring it");
                None
            }
        }
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = save_json(self.store.as_ref(), key, value).await {
            error!(error = %e, key, "Failed to save daily record");
        }
    }

    async fn load_or_generate(&self, today: NaiveDate) -> DailyChallengeRecord {
        match self.read_optional::<DailyChallengeRecord>(CHALLENGE_KEY).await {
            Some(challenge) if challenge.date == today => challenge,
            _ => {
                let challenge = generate(today);
                debug!(
                    %today,
                    player1 = %challenge.player1,
                    player2 = %challenge.player2,
                    "Generated daily challenge"
                );
                self.write(CHALLENGE_KEY, &challenge).await;
                challenge
            }
        }
    }

    /// Today's pairing; generated and stored on first read of the day.
    #[instrument(skip(self))]
    pub async fn current_challenge(&self, today: NaiveDate) -> DailyChallengeRecord {
        let _guard = self.lock.lock().await;
        self.load_or_generate(today).await
    }

    /// Marks today's challenge complete. A second completion on the same day
    /// returns the stored record and changes nothing.
    #[instrument(skip(self))]
    pub async fn complete_challenge(
        &self,
        today: NaiveDate,
        result: DailyResult,
    ) -> DailyCompletion {
        let _guard = self.lock.lock().await;
        let mut challenge = self.load_or_generate(today).await;
        let mut streak: DailyStreak = self.read(STREAK_KEY).await;
        let mut stats: DailyStats = self.read(STATS_KEY).await;

        if challenge.completed {
            debug!(%today, "Daily challenge already completed");
            return DailyCompletion {
                challenge,
                already_completed: true,
                streak: streak.current,
                stats,
            };
        }

        challenge.completed = true;
        challenge.result = Some(result);
        challenge.xp_awarded = DAILY_XP;
        stats.record(result);
        streak.complete(today);

        self.write(CHALLENGE_KEY, &challenge).await;
        self.write(STATS_KEY, &stats).await;
        self.write(STREAK_KEY, &streak).await;

        info!(%today, ?result, streak = streak.current, "Daily challenge completed");
        DailyCompletion {
            challenge,
            already_completed: false,
            streak: streak.current,
            stats,
        }
    }

    /// Current streak, reset to zero first if a day was missed.
    #[instrument(skip(self))]
    pub async fn streak(&self, today: NaiveDate) -> u32 {
        let _guard = self.lock.lock().await;
        let mut streak: DailyStreak = self.read(STREAK_KEY).await;
        if streak.validate(today) {
            debug!(%today, "Daily streak expired");
            self.write(STREAK_KEY, &streak).await;
        }
        streak.current
    }

    pub async fn stats(&self) -> DailyStats {
        self.read(STATS_KEY).await
    }

    pub async fn summary(&self, today: NaiveDate) -> DailySummary {
        DailySummary {
            streak: self.streak(today).await,
            stats: self.stats().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryKeyValueStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn service() -> DailyChallengeService {
        DailyChallengeService::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    #[tokio::test]
    async fn reading_twice_returns_the_same_challenge() {
        let daily = service();
        let first = daily.current_challenge(day(1)).await;
        let second = daily.current_challenge(day(1)).await;
        assert_eq!(first, second);
        assert_eq!(first, generate(day(1)));
    }

    #[tokio::test]
    async fn new_day_replaces_the_stored_challenge() {
        let daily = service();
        daily.complete_challenge(day(1), DailyResult::Player1).await;

        let next = daily.current_challenge(day(2)).await;
        assert_eq!(next.date, day(2));
        assert!(!next.completed);
    }

    #[tokio::test]
    async fn completion_awards_xp_once() {
        let daily = service();

        let done = daily.complete_challenge(day(1), DailyResult::Tie).await;
        assert!(!done.already_completed);
        assert_eq!(done.challenge.xp_awarded, DAILY_XP);
        assert_eq!(done.challenge.result, Some(DailyResult::Tie));
        assert_eq!(done.streak, 1);

        let again = daily.complete_challenge(day(1), DailyResult::Player2).await;
        assert!(again.already_completed);
        assert_eq!(again.challenge.result, Some(DailyResult::Tie));
        assert_eq!(again.stats.total_completed, 1);
        assert_eq!(again.stats.ties, 1);
    }

    #[tokio::test]
    async fn streak_counts_consecutive_days_and_expires() {
        let daily = service();
        daily.complete_challenge(day(1), DailyResult::Player1).await;
        daily.complete_challenge(day(2), DailyResult::Player2).await;
        let third = daily.complete_challenge(day(3), DailyResult::Player1).await;
        assert_eq!(third.streak, 3);
        assert_eq!(third.stats.wins, 3);

        assert_eq!(daily.streak(day(4)).await, 3);
        assert_eq!(daily.streak(day(5)).await, 0);

        let restarted = daily.complete_challenge(day(6), DailyResult::Tie).await;
        assert_eq!(restarted.streak, 1);
    }

    #[tokio::test]
    async fn corrupt_records_fall_back_to_defaults() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store.set(CHALLENGE_KEY, "nope").await.unwrap();
        store.set(STATS_KEY, "nope").await.unwrap();
        let daily = DailyChallengeService::new(store);

        assert_eq!(daily.current_challenge(day(1)).await, generate(day(1)));
        assert_eq!(daily.stats().await, DailyStats::default());
    }
}
