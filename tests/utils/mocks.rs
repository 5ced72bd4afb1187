use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use gitfight::{FetchError, ProfileRecord, ProfileSource, RepositorySummary};

// ============================================================================
// Mock Infrastructure
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    NotFound,
    RateLimited,
    Upstream,
}

#[derive(Debug, Clone)]
pub struct Fighter {
    pub followers: u64,
    pub repos: u64,
    pub stars_per_repo: u64,
}

/// Canned GitHub data. Unknown logins fall back to `default_fighter` when set.
#[derive(Clone, Default)]
pub struct MockProfileSource {
    fighters: Arc<RwLock<HashMap<String, Fighter>>>,
    failures: Arc<RwLock<HashMap<String, Failure>>>,
    default_fighter: Option<Fighter>,
}

impl MockProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_fighter(mut self, fighter: Fighter) -> Self {
        self.default_fighter = Some(fighter);
        self
    }

    pub async fn add_fighter(&self, login: &str, fighter: Fighter) {
        self.fighters
            .write()
            .await
            .insert(login.to_lowercase(), fighter);
    }

    pub async fn fail_for(&self, login: &str, failure: Failure) {
        self.failures
            .write()
            .await
            .insert(login.to_lowercase(), failure);
    }

    async fn lookup(&self, username: &str) -> Result<Fighter, FetchError> {
        let key = username.to_lowercase();
        if let Some(failure) = self.failures.read().await.get(&key) {
            return Err(match failure {
                Failure::NotFound => FetchError::NotFound(username.to_string()),
                Failure::RateLimited => FetchError::RateLimited,
                Failure::Upstream => FetchError::Upstream("HTTP 503".to_string()),
            });
        }
        self.fighters
            .read()
            .await
            .get(&key)
            .cloned()
            .or_else(|| self.default_fighter.clone())
            .ok_or_else(|| FetchError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl ProfileSource for MockProfileSource {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, FetchError> {
        let fighter = self.lookup(username).await?;

        Ok(ProfileRecord {
            login: username.to_string(),
            avatar_url: format!("https://avatars.example/{username}"),
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
                - Duration::days(fighter.followers.min(3000) as i64),
            followers: fighter.followers,
            following: 1,
            public_repos: fighter.repos,
            public_gists: 0,
        })
    }

    async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<RepositorySummary>, FetchError> {
        let fighter = self.lookup(username).await?;

        Ok((0..fighter.repos)
            .map(|i| RepositorySummary {
                name: format!("{username}-{i}"),
                stargazers_count: fighter.stars_per_repo,
                forks_count: fighter.stars_per_repo / 2,
                ..RepositorySummary::default()
            })
            .collect())
    }
}
