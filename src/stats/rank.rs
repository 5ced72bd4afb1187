use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::StatisticsRecord;

/// Power tier, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Rookie,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Legend,
}

impl Rank {
    pub fn min_power(&self) -> f64 {
        match self {
            Rank::Rookie => 0.0,
            Rank::Bronze => 20.0,
            Rank::Silver => 40.0,
            Rank::Gold => 60.0,
            Rank::Platinum => 75.0,
            Rank::Diamond => 85.0,
            Rank::Legend => 95.0,
        }
    }

    pub fn for_power(power: f64) -> Rank {
        Rank::iter()
            .rev()
            .find(|rank| power >= rank.min_power())
            .unwrap_or(Rank::Rookie)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleGroup {
    HighStars,
    HighFollowers,
    HighRepos,
    Veteran,
    Balanced,
}

impl TitleGroup {
    pub fn for_statistics(stats: &StatisticsRecord) -> TitleGroup {
        if stats.stars > 10_000 {
            TitleGroup::HighStars
        } else if stats.followers > 5_000 {
            TitleGroup::HighFollowers
        } else if stats.repos > 100 {
            TitleGroup::HighRepos
        } else if stats.age > 10.0 {
            TitleGroup::Veteran
        } else {
            TitleGroup::Balanced
        }
    }

    pub fn titles(&self) -> &'static [&'static str] {
        match self {
            TitleGroup::HighStars => &["Star Collector", "Star Lord", "Celestial"],
            TitleGroup::HighFollowers => &["Influencer", "Community Leader", "Icon"],
            TitleGroup::HighRepos => &["Prolific Coder", "Repository King", "Code Factory"],
            TitleGroup::Veteran => &["GitHub Veteran", "Old Guard", "Pioneer"],
            TitleGroup::Balanced => &["Well Rounded", "Jack of All Trades", "Balanced Fighter"],
        }
    }
}

pub fn pick_title(stats: &StatisticsRecord) -> &'static str {
    let titles = TitleGroup::for_statistics(stats).titles();
    titles.choose(&mut rand::rng()).copied().unwrap_or(titles[0])
}
