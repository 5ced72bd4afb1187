use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::{
    AchievementId, BattleOutcome, LedgerError, LedgerUpdate, UsageLedgerRecord, WinnerTally,
};
use crate::store::{load_json, save_json, KeyValueStore};

pub const LEDGER_KEY: &str = "gitfight.ledger.v2";

/// Loads, mutates and saves the usage ledger.
///
/// Reads never fail: a missing or unreadable ledger degrades to defaults.
/// Failed writes are logged and the in-memory result is still returned.
pub struct UsageLedgerService {
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl UsageLedgerService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&self, now: DateTime<Utc>) -> UsageLedgerRecord {
        let mut ledger = match load_json::<UsageLedgerRecord>(self.store.as_ref(), LEDGER_KEY).await
        {
            Ok(Some(ledger)) => ledger,
            Ok(None) => {
                debug!("No stored ledger, starting fresh");
                UsageLedgerRecord::default()
            }
            Err(e) => {
                warn!(error = %e, "Stored ledger unreadable, falling back to defaults");
                UsageLedgerRecord::default()
            }
        };

        if ledger.roll_over(now.date_naive()) {
            debug!(
                max_daily_battles = ledger.max_daily_battles,
                "Ledger rolled over to a new day"
            );
        }
        ledger
    }

    /// Saves the ledger, refreshing `last_visit`. Returns whether the write succeeded.
    #[instrument(skip(self, ledger))]
    pub async fn persist(&self, ledger: &mut UsageLedgerRecord, now: DateTime<Utc>) -> bool {
        ledger.touch(now);
        match save_json(self.store.as_ref(), LEDGER_KEY, ledger).await {
            Ok(()) => {
                debug!(total_battles = ledger.total_battles, "Ledger saved");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to save ledger");
                false
            }
        }
    }

    /// Runs one read-modify-write cycle. Nothing is saved when `mutate` fails.
    pub async fn update<T, F>(
        &self,
        now: DateTime<Utc>,
        mutate: F,
    ) -> Result<(UsageLedgerRecord, T), LedgerError>
    where
        F: FnOnce(&mut UsageLedgerRecord) -> Result<T, LedgerError>,
    {
        let _guard = self.lock.lock().await;
        let mut ledger = self.load(now).await;
        let value = mutate(&mut ledger)?;
        self.persist(&mut ledger, now).await;
        Ok((ledger, value))
    }

    /// Applies the combo peaks seen during a battle and then the battle itself.
    #[instrument(skip(self, combos))]
    pub async fn record_battle(
        &self,
        outcome: &BattleOutcome,
        combos: &[u32],
        now: DateTime<Utc>,
    ) -> Result<(UsageLedgerRecord, LedgerUpdate), LedgerError> {
        self.update(now, |ledger| {
            let mut combo_unlocks = Vec::new();
            for combo in combos {
                combo_unlocks.extend(ledger.record_combo(*combo));
            }
            let mut update = ledger.record_battle(outcome, now)?;
            combo_unlocks.append(&mut update.new_achievements);
            update.new_achievements = combo_unlocks;
            Ok(update)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn record_combo(
        &self,
        combo: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<AchievementId>, LedgerError> {
        let (_, unlocked) = self
            .update(now, |ledger| Ok(ledger.record_combo(combo)))
            .await?;
        Ok(unlocked)
    }

    #[instrument(skip(self))]
    pub async fn award_xp(&self, amount: u64, now: DateTime<Utc>) -> Result<u32, LedgerError> {
        let (ledger, levels) = self
            .update(now, |ledger| Ok(ledger.award_xp(amount)))
            .await?;
        debug!(xp = ledger.xp, level = ledger.level, levels, "XP awarded");
        Ok(levels)
    }

    #[instrument(skip(self))]
    pub async fn record_visit(&self, now: DateTime<Utc>) -> Result<UsageLedgerRecord, LedgerError> {
        let (ledger, ()) = self
            .update(now, |ledger| {
                ledger.record_visit(now);
                Ok(())
            })
            .await?;
        Ok(ledger)
    }

    pub async fn top_winners(&self, limit: usize, now: DateTime<Utc>) -> Vec<WinnerTally> {
        self.load(now).await.top_winners(limit)
    }

    /// Removes the stored ledger; the next read starts from defaults.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), LedgerError> {
        let _guard = self.lock.lock().await;
        self.store.remove(LEDGER_KEY).await?;
        info!("Usage ledger cleared");
        Ok(())
    }
}
