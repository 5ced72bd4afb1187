use serde::Deserialize;
use std::path::PathBuf;

use crate::battle::{BattleCategory, STANDARD_CATEGORIES};

pub const ENV_PREFIX: &str = "GITFIGHT_";

/// Service configuration, read from `GITFIGHT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    pub github_token: Option<String>,
    /// Remote forwarding is disabled when unset.
    pub leaderboard_url: Option<String>,
    pub database_url: Option<String>,
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub extended_categories: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres(String),
    File(PathBuf),
    Memory,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env::<AppConfig>()
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(pairs)
    }

    /// Database first, then file, then memory.
    pub fn store_backend(&self) -> StoreBackend {
        match (&self.database_url, &self.store_path) {
            (Some(url), _) => StoreBackend::Postgres(url.clone()),
            (None, Some(path)) => StoreBackend::File(path.clone()),
            (None, None) => StoreBackend::Memory,
        }
    }

    pub fn categories(&self) -> Vec<BattleCategory> {
        if self.extended_categories {
            BattleCategory::all()
        } else {
            STANDARD_CATEGORIES.to_vec()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            github_api_url: default_github_api_url(),
            github_token: None,
            leaderboard_url: None,
            database_url: None,
            store_path: None,
            extended_categories: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_pairs(Vec::new()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store_backend(), StoreBackend::Memory);
        assert_eq!(config.categories().len(), 7);
    }

    #[test]
    fn prefixed_variables_are_read() {
        let config = AppConfig::from_pairs(pairs(&[
            ("GITFIGHT_BIND_ADDRESS", "127.0.0.1:8080"),
            ("GITFIGHT_GITHUB_TOKEN", "secret"),
            ("GITFIGHT_EXTENDED_CATEGORIES", "true"),
            ("GITFIGHT_STORE_PATH", "/tmp/gitfight.json"),
            ("BIND_ADDRESS", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.github_token.as_deref(), Some("secret"));
        assert_eq!(config.categories().len(), 12);
        assert_eq!(
            config.store_backend(),
            StoreBackend::File(PathBuf::from("/tmp/gitfight.json"))
        );
    }

    #[test]
    fn database_wins_over_file_store() {
        let config = AppConfig::from_pairs(pairs(&[
            ("GITFIGHT_DATABASE_URL", "postgres://localhost/gitfight"),
            ("GITFIGHT_STORE_PATH", "/tmp/gitfight.json"),
        ]))
        .unwrap();

        assert_eq!(
            config.store_backend(),
            StoreBackend::Postgres("postgres://localhost/gitfight".to_string())
        );
    }

    #[test]
    fn malformed_flag_is_an_error() {
        assert!(AppConfig::from_pairs(pairs(&[("GITFIGHT_EXTENDED_CATEGORIES", "maybe")])).is_err());
    }
}
