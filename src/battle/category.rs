use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::stats::StatisticsRecord;

/// A comparable statistic. Declaration order is round order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum BattleCategory {
    Stars,
    Repos,
    Followers,
    Age,
    StarsPerRepo,
    FollowerRatio,
    Forks,
    PullRequests,
    Issues,
    CommitFreq,
    Languages,
    Gists,
}

/// Round order of a standard battle.
pub const STANDARD_CATEGORIES: [BattleCategory; 7] = [
    BattleCategory::Stars,
    BattleCategory::Repos,
    BattleCategory::Followers,
    BattleCategory::Age,
    BattleCategory::StarsPerRepo,
    BattleCategory::FollowerRatio,
    BattleCategory::Forks,
];

/// Winning every round of a standard battle.
pub const PERFECT_SCORE: u32 = STANDARD_CATEGORIES.len() as u32;

impl BattleCategory {
    pub fn all() -> Vec<BattleCategory> {
        BattleCategory::iter().collect()
    }

    pub fn key(&self) -> &'static str {
        match self {
            BattleCategory::Stars => "stars",
            BattleCategory::Repos => "repos",
            BattleCategory::Followers => "followers",
            BattleCategory::Age => "age",
            BattleCategory::StarsPerRepo => "starsPerRepo",
            BattleCategory::FollowerRatio => "followerRatio",
            BattleCategory::Forks => "forks",
            BattleCategory::PullRequests => "pullRequests",
            BattleCategory::Issues => "issues",
            BattleCategory::CommitFreq => "commitFreq",
            BattleCategory::Languages => "languages",
            BattleCategory::Gists => "gists",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BattleCategory::Stars => "TOTAL STARS",
            BattleCategory::Repos => "REPOSITORIES",
            BattleCategory::Followers => "FOLLOWERS",
            BattleCategory::Age => "YEARS ON GITHUB",
            BattleCategory::StarsPerRepo => "STARS PER REPO",
            BattleCategory::FollowerRatio => "FOLLOWER RATIO",
            BattleCategory::Forks => "TOTAL FORKS",
            BattleCategory::PullRequests => "PULL REQUESTS",
            BattleCategory::Issues => "ISSUES",
            BattleCategory::CommitFreq => "COMMITS/MONTH",
            BattleCategory::Languages => "LANGUAGES",
            BattleCategory::Gists => "GISTS",
        }
    }

    pub fn value(&self, stats: &StatisticsRecord) -> f64 {
        match self {
            BattleCategory::Stars => stats.stars as f64,
            BattleCategory::Repos => stats.repos as f64,
            BattleCategory::Followers => stats.followers as f64,
            BattleCategory::Age => stats.age,
            BattleCategory::StarsPerRepo => stats.stars_per_repo,
            BattleCategory::FollowerRatio => stats.follower_ratio,
            BattleCategory::Forks => stats.forks as f64,
            BattleCategory::PullRequests => stats.pull_requests as f64,
            BattleCategory::Issues => stats.issues as f64,
            BattleCategory::CommitFreq => stats.commit_freq,
            BattleCategory::Languages => stats.languages as f64,
            BattleCategory::Gists => stats.gists as f64,
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            BattleCategory::Age | BattleCategory::CommitFreq => format!("{value:.1}"),
            BattleCategory::StarsPerRepo | BattleCategory::FollowerRatio => format!("{value:.2}"),
            _ => (value.max(0.0).round() as u64).to_formatted_string(&Locale::en),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn catalog_order_is_fixed() {
        let keys: Vec<_> = BattleCategory::all().iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "stars",
                "repos",
                "followers",
                "age",
                "starsPerRepo",
                "followerRatio",
                "forks",
                "pullRequests",
                "issues",
                "commitFreq",
                "languages",
                "gists"
            ]
        );
        assert_eq!(&BattleCategory::all()[..7], &STANDARD_CATEGORIES[..]);
        assert_eq!(PERFECT_SCORE, 7);
    }

    #[rstest]
    #[case(BattleCategory::Stars, 1234567.0, "1,234,567")]
    #[case(BattleCategory::Forks, 42.0, "42")]
    #[case(BattleCategory::Age, 12.3456, "12.3")]
    #[case(BattleCategory::CommitFreq, 4.0, "4.0")]
    #[case(BattleCategory::StarsPerRepo, 10.0 / 3.0, "3.33")]
    #[case(BattleCategory::FollowerRatio, 2.5, "2.50")]
    fn formats_values_per_category(
        #[case] category: BattleCategory,
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(category.format(value), expected);
    }

    #[test]
    fn serde_uses_category_keys() {
        for category in BattleCategory::iter() {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
        assert!(serde_json::from_str::<BattleCategory>("\"karma\"").is_err());
    }

    #[test]
    fn value_reads_named_field() {
        let stats = StatisticsRecord {
            followers: 9,
            commit_freq: 1.5,
            ..StatisticsRecord::default()
        };
        assert_eq!(BattleCategory::Followers.value(&stats), 9.0);
        assert_eq!(BattleCategory::CommitFreq.value(&stats), 1.5);
    }
}
