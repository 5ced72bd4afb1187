use axum::Router;
use std::sync::Arc;

use gitfight::{
    AppState, ArenaService, BattleCategory, InMemoryKeyValueStore, InMemoryLeaderboard,
    KeyValueStore,
};

use super::mocks::{Fighter, MockProfileSource};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub router: Router,
    pub profiles: MockProfileSource,
    pub leaderboard: Option<InMemoryLeaderboard>,
}

pub struct TestSetupBuilder {
    fighters: Vec<(String, Fighter)>,
    store: Option<Arc<InMemoryKeyValueStore>>,
    leaderboard: bool,
    categories: Vec<BattleCategory>,
    default_fighter: Option<Fighter>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            fighters: vec![],
            store: None,
            leaderboard: false,
            categories: vec![],
            default_fighter: None,
        }
    }

    pub fn with_fighter(mut self, login: &str, followers: u64, repos: u64, stars: u64) -> Self {
        self.fighters.push((
            login.to_string(),
            Fighter {
                followers,
                repos,
                stars_per_repo: stars,
            },
        ));
        self
    }

    /// A strong and a weak fighter that always produce a 7-0 sweep.
    pub fn with_champion_and_rookie(self) -> Self {
        self.with_fighter("champion", 3000, 30, 300)
            .with_fighter("rookie", 2, 1, 0)
    }

    /// Any unknown login resolves to a mid-sized fighter.
    pub fn with_open_roster(mut self) -> Self {
        self.default_fighter = Some(Fighter {
            followers: 100,
            repos: 10,
            stars_per_repo: 10,
        });
        self
    }

    pub fn with_store(mut self, store: Arc<InMemoryKeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_leaderboard(mut self) -> Self {
        self.leaderboard = true;
        self
    }

    pub fn with_categories(mut self, categories: Vec<BattleCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub async fn build(self) -> TestSetup {
        let mut profiles = MockProfileSource::new();
        if let Some(fighter) = self.default_fighter {
            profiles = profiles.with_default_fighter(fighter);
        }
        for (login, fighter) in self.fighters {
            profiles.add_fighter(&login, fighter).await;
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryKeyValueStore::new()));
        let leaderboard = self.leaderboard.then(InMemoryLeaderboard::new);

        let mut builder = ArenaService::builder(
            Arc::new(profiles.clone()),
            store as Arc<dyn KeyValueStore>,
        )
        .with_categories(self.categories);
        if let Some(leaderboard) = &leaderboard {
            builder = builder.with_leaderboard(Arc::new(leaderboard.clone()));
        }

        let router = gitfight::app(AppState::new(Arc::new(builder.build())));

        TestSetup {
            router,
            profiles,
            leaderboard,
        }
    }
}
