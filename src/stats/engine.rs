use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{StatisticsRecord, StatsError};
use crate::github::{ProfileRecord, RepositorySummary};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const DAYS_PER_JULIAN_YEAR: f64 = 365.25;
const DAYS_PER_ACTIVITY_MONTH: f64 = 30.0;
const MONTHS_PER_ESTIMATED_PR: f64 = 3.0;
const MONTHS_PER_YEAR: f64 = 12.0;

pub const MAX_POWER: u32 = 100;

/// Divisors/multipliers and caps of the weighted power formula.
/// Each contribution is `min(value op factor, cap)`.
pub mod power_weights {
    pub const STARS_DIVISOR: f64 = 100.0;
    pub const STARS_CAP: f64 = 30.0;
    pub const REPOS_FACTOR: f64 = 0.5;
    pub const REPOS_CAP: f64 = 20.0;
    pub const FOLLOWERS_DIVISOR: f64 = 50.0;
    pub const FOLLOWERS_CAP: f64 = 25.0;
    pub const AGE_FACTOR: f64 = 2.0;
    pub const AGE_CAP: f64 = 10.0;
    pub const STARS_PER_REPO_FACTOR: f64 = 2.0;
    pub const STARS_PER_REPO_CAP: f64 = 15.0;
    pub const PULL_REQUESTS_DIVISOR: f64 = 10.0;
    pub const PULL_REQUESTS_CAP: f64 = 8.0;
    pub const COMMIT_FREQ_DIVISOR: f64 = 20.0;
    pub const COMMIT_FREQ_CAP: f64 = 7.0;
    pub const LANGUAGES_FACTOR: f64 = 2.0;
    pub const LANGUAGES_CAP: f64 = 10.0;
}

pub fn compute_statistics(
    profile: &ProfileRecord,
    repos: &[RepositorySummary],
) -> Result<StatisticsRecord, StatsError> {
    compute_statistics_at(profile, repos, Utc::now())
}

/// Derives the statistics record as of `now`.
pub fn compute_statistics_at(
    profile: &ProfileRecord,
    repos: &[RepositorySummary],
    now: DateTime<Utc>,
) -> Result<StatisticsRecord, StatsError> {
    if profile.login.trim().is_empty() {
        return Err(StatsError::InvalidInput(
            "profile is missing a login".to_string(),
        ));
    }

    let stars: u64 = repos.iter().map(|r| r.stargazers_count).sum();
    let forks: u64 = repos.iter().map(|r| r.forks_count).sum();
    let issues: u64 = repos.iter().map(|r| r.open_issues_count).sum();
    let repo_count = repos.len() as u64;

    let stars_per_repo = if repo_count > 0 {
        stars as f64 / repo_count as f64
    } else {
        0.0
    };
    let follower_ratio = if profile.following > 0 {
        profile.followers as f64 / profile.following as f64
    } else {
        profile.followers as f64
    };
    let commit_freq = if repo_count > 0 {
        round_to_tenth((stars + forks) as f64 / repo_count as f64 / MONTHS_PER_YEAR)
    } else {
        0.0
    };

    let languages = repos
        .iter()
        .filter_map(|r| r.language.as_deref())
        .filter(|language| !language.is_empty())
        .collect::<HashSet<_>>()
        .len() as u64;

    Ok(StatisticsRecord {
        stars,
        repos: repo_count,
        followers: profile.followers,
        forks,
        age: elapsed_days(profile.created_at, now) / DAYS_PER_JULIAN_YEAR,
        stars_per_repo,
        follower_ratio,
        pull_requests: repos.iter().map(|r| estimated_pull_requests(r, now)).sum(),
        issues,
        commit_freq,
        languages,
        gists: profile.public_gists,
    })
}

/// Raw-payload form: `profile` and `repos` as received from upstream.
pub fn compute_statistics_from_json(
    profile: &Value,
    repos: &Value,
) -> Result<StatisticsRecord, StatsError> {
    let repos = repos.as_array().ok_or_else(|| {
        StatsError::InvalidInput("repository payload is not a list".to_string())
    })?;
    let profile: ProfileRecord = serde_json::from_value(profile.clone())
        .map_err(|e| StatsError::InvalidInput(format!("malformed profile: {e}")))?;
    let repos = repos
        .iter()
        .map(|repo| serde_json::from_value::<RepositorySummary>(repo.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StatsError::InvalidInput(format!("malformed repository: {e}")))?;

    compute_statistics(&profile, &repos)
}

/// Weighted, capped power level in `[0, 100]`.
pub fn compute_power_level(
    profile: &ProfileRecord,
    repos: &[RepositorySummary],
) -> Result<u32, StatsError> {
    Ok(power_from_statistics(&compute_statistics(profile, repos)?))
}

pub fn power_from_statistics(stats: &StatisticsRecord) -> u32 {
    use power_weights::*;

    let power = (stats.stars as f64 / STARS_DIVISOR).min(STARS_CAP)
        + (stats.repos as f64 * REPOS_FACTOR).min(REPOS_CAP)
        + (stats.followers as f64 / FOLLOWERS_DIVISOR).min(FOLLOWERS_CAP)
        + (stats.age * AGE_FACTOR).min(AGE_CAP)
        + (stats.stars_per_repo * STARS_PER_REPO_FACTOR).min(STARS_PER_REPO_CAP)
        + (stats.pull_requests as f64 / PULL_REQUESTS_DIVISOR).min(PULL_REQUESTS_CAP)
        + (stats.commit_freq / COMMIT_FREQ_DIVISOR).min(COMMIT_FREQ_CAP)
        + (stats.languages as f64 * LANGUAGES_FACTOR).min(LANGUAGES_CAP);

    (power.max(0.0).round() as u32).min(MAX_POWER)
}

/// Logarithmic power used for fighter previews. Unlike the weighted formula it
/// reads the profile's own repository count and is not rounded.
pub fn compute_preview_power(
    profile: &ProfileRecord,
    repos: &[RepositorySummary],
) -> Result<f64, StatsError> {
    if profile.login.trim().is_empty() {
        return Err(StatsError::InvalidInput(
            "profile is missing a login".to_string(),
        ));
    }

    let stars: u64 = repos.iter().map(|r| r.stargazers_count).sum();
    let forks: u64 = repos.iter().map(|r| r.forks_count).sum();
    let public_repos = profile.public_repos as f64;
    let stars_per_repo_bonus = if profile.public_repos > 0 {
        stars as f64 / public_repos * 0.5
    } else {
        0.0
    };

    let power = (stars as f64 + 1.0).log10() * 15.0
        + (forks as f64 + 1.0).log10() * 10.0
        + (profile.followers as f64 + 1.0).log10() * 12.0
        + (public_repos + 1.0).log10() * 5.0
        + stars_per_repo_bonus.min(10.0);

    Ok(power.min(MAX_POWER as f64))
}

fn estimated_pull_requests(repo: &RepositorySummary, now: DateTime<Utc>) -> u64 {
    match (repo.pushed_at, repo.updated_at) {
        (Some(_), Some(updated_at)) => {
            let months_active = elapsed_days(updated_at, now) / DAYS_PER_ACTIVITY_MONTH;
            ((months_active / MONTHS_PER_ESTIMATED_PR).floor() as u64).max(1)
        }
        _ => 0,
    }
}

fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - since).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_DAY
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
