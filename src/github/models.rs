use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile as returned by `GET /users/{username}`.
///
/// Unknown fields in the upstream payload are ignored. The follower,
/// following and repository counts are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
}

/// One entry of `GET /users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepositorySummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
