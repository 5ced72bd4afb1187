use super::{power_from_statistics, StatisticsRecord, StatsError, TeamStatisticsRecord};

/// Combines member statistics into one team record.
///
/// Counts are summed, per-member rates are averaged and language diversity
/// takes the widest member so a larger team does not inflate it.
pub fn aggregate(members: &[StatisticsRecord]) -> Result<TeamStatisticsRecord, StatsError> {
    if members.is_empty() {
        return Err(StatsError::EmptyTeam);
    }

    let count = members.len() as f64;
    let sum = |field: fn(&StatisticsRecord) -> u64| members.iter().map(field).sum::<u64>();
    let mean = |field: fn(&StatisticsRecord) -> f64| members.iter().map(field).sum::<f64>() / count;

    let statistics = StatisticsRecord {
        stars: sum(|s| s.stars),
        repos: sum(|s| s.repos),
        followers: sum(|s| s.followers),
        forks: sum(|s| s.forks),
        pull_requests: sum(|s| s.pull_requests),
        issues: sum(|s| s.issues),
        gists: sum(|s| s.gists),
        age: mean(|s| s.age),
        stars_per_repo: mean(|s| s.stars_per_repo),
        follower_ratio: mean(|s| s.follower_ratio),
        commit_freq: mean(|s| s.commit_freq),
        languages: members.iter().map(|s| s.languages).max().unwrap_or_default(),
    };

    Ok(TeamStatisticsRecord {
        members: members.len(),
        statistics,
    })
}

pub fn team_power(team: &TeamStatisticsRecord) -> u32 {
    power_from_statistics(&team.statistics)
}
