use chrono::NaiveDate;

use super::DailyChallengeRecord;
use crate::roster::FAMOUS_DEVS;

/// 32-bit polynomial string hash (`hash * 31 + unit` over UTF-16 units,
/// wrapping), returned as its absolute value.
pub fn hash_date(date: &str) -> i64 {
    let hash = date.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    i64::from(hash).abs()
}

/// Fractional part of `sin(seed) * 10000`, in `[0, 1)`.
///
/// This exact construction is what makes pairings reproducible; it must not
/// be swapped for a general-purpose RNG.
pub fn seeded_random(seed: i64) -> f64 {
    let x = (seed as f64).sin() * 10000.0;
    x - x.floor()
}

fn pick(fraction: f64) -> &'static str {
    let index = ((fraction * FAMOUS_DEVS.len() as f64).floor() as usize).min(FAMOUS_DEVS.len() - 1);
    FAMOUS_DEVS[index]
}

/// Derives the pairing for `date`. The same date always yields the same pair.
pub fn generate(date: NaiveDate) -> DailyChallengeRecord {
    let seed = hash_date(&date.format("%Y-%m-%d").to_string());

    DailyChallengeRecord {
        date,
        player1: pick(seeded_random(seed)).to_string(),
        player2: pick(seeded_random(seed + 1)).to_string(),
        completed: false,
        result: None,
        xp_awarded: 0,
    }
}
