use rand::seq::IndexedRandom;

/// Well-known GitHub handles used for random opponents, daily challenge
/// pairings and the "legends defeated" tally.
///
/// Order and duplicates are significant: daily challenge pairings index into
/// this list, so changing it changes every historical pairing.
pub const FAMOUS_DEVS: &[&str] = &[
    // Legends
    "torvalds", "gvanrossum", "brendaneich", "timberners-lee", "gaearon",
    "dhh", "mojombo", "defunkt", "tj", "antirez",
    "yyx990803", "migueldeicaza", "pjhyett", "schacon", "ry",
    "evykassirer", "github", "microsoft", "google", "facebook",
    // Library authors
    "sindresorhus", "addyosmani", "paulirish", "fat", "mdo",
    "jeresig", "fabpot", "taylorotwell", "wesbos", "kentcdodds",
    "mpj", "dan_abramov", "swyx", "cassidoo", "sarah_edo",
    "TheLarkInn", "youyuxi", "antfu", "patak-dev", "bluwy",
    "sokra", "evanw", "jlongster", "vjeux", "vjeux",
    "orta", "rkrasiuk", "kolodny", "amasad", "gresham",
    "addyosmani", "subtleGradient", "tmm1", "slexaxton", "littledan",
    // Rising stars
    "monkwonderland", "acdlite", "threepointone", "sebmarkbage", "sophiebits",
    "szhell", "lencioni", "gman", "tomocchino", "seungho",
    "vjeux", "jcdav", "dominictarr", "substack", "esnext",
    "zcbenz", "sindresorhus", "jashkenas", "visionmedia", "bnoordhuis",
    "ry", "jasnell", "cjihrig", "addaleax", "targos",
    "Flarna", "everyoneisbots", "bzbarsky", "domenic", "slightlyoff",
    // Educators
    "traversymedia", "fireship-io", "academind", "developedbyed", "cleverprogrammer",
    "codewithharry", "hiteshchoudhary", "thenetninjas", "programmingwithmosh", "freecodecamp",
    "thecodeshot", "poojag50", "tech_with_nana", "codeWithHarry", "jamesQQuick",
    "learnwithjason", "kyleshevlin", "eggheadio", "frontendmasters", "scrimba",
    // Organizations and projects
    "vercel", "nextjs", "remix-run", "solidjs", "astro",
    "qwikdev", "sveltejs", "vuejs", "angular", "reactjs",
    "emberjs", "backbonejs", "underscorejs", "lodash", "momentjs",
    "webpack", "vite", "parcel", "rollup", "esbuild",
    "typescript", "babel", "postcss", "tailwindcss", "chakra-ui",
];

/// Case-insensitive membership test against [`FAMOUS_DEVS`].
pub fn is_famous(username: &str) -> bool {
    FAMOUS_DEVS
        .iter()
        .any(|dev| dev.eq_ignore_ascii_case(username))
}

/// Picks a random famous developer that is not `player`.
pub fn random_opponent(player: &str) -> &'static str {
    let mut rng = rand::rng();
    loop {
        // The list is non-empty and holds more than one distinct handle.
        let Some(candidate) = FAMOUS_DEVS.choose(&mut rng) else {
            return "torvalds";
        };
        if !candidate.eq_ignore_ascii_case(player) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn famous_lookup_ignores_case() {
        assert!(is_famous("torvalds"));
        assert!(is_famous("Torvalds"));
        assert!(is_famous("thelarkinn"));
        assert!(!is_famous("definitely-not-famous-42"));
    }

    #[test]
    fn random_opponent_never_returns_the_player() {
        for _ in 0..200 {
            let opponent = random_opponent("torvalds");
            assert!(!opponent.eq_ignore_ascii_case("torvalds"));
            assert!(is_famous(opponent));
        }
    }

    #[test]
    fn roster_keeps_its_pairing_length() {
        assert_eq!(FAMOUS_DEVS.len(), 130);
    }
}
