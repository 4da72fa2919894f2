//! Round classification: free-text round labels to ordinal knockout ranks.

use crate::RoundKey;

pub const FINAL: u8 = 100;
pub const SEMI_FINAL: u8 = 90;
pub const QUARTER_FINAL: u8 = 80;
pub const ROUND_OF_16: u8 = 70;
pub const ROUND_OF_32: u8 = 60;
pub const ROUND_OF_64: u8 = 50;
pub const UNRANKED: u8 = 0;

/// How many rounds to keep when the labels never reach the Round of 16.
const FALLBACK_ROUNDS: usize = 4;

/// Map a round label to its knockout rank.
///
/// Stages are tested from most to least specific. "final" is tested last because
/// "Semi-finals" and "Quarter-finals" both contain it.
pub fn classify(label: &str) -> u8 {
    let l = label.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| l.contains(n));

    if has(&["semi", "1/2"]) {
        SEMI_FINAL
    } else if has(&["quarter", "1/4"]) {
        QUARTER_FINAL
    } else if has(&["round of 16", "playoff", "play-off", "1/8"]) {
        ROUND_OF_16
    } else if has(&["round of 32", "1/16"]) {
        ROUND_OF_32
    } else if has(&["round of 64", "1/32"]) {
        ROUND_OF_64
    } else if has(&["final"]) {
        FINAL
    } else {
        UNRANKED
    }
}

/// Rounds chosen for the bracket, earliest stage first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub rounds: Vec<RoundKey>,
    /// True when no label reached the Round of 16 and the first rounds were taken instead.
    pub fallback: bool,
}

/// Classify every distinct label and order the knockout rounds by ascending rank.
pub fn select_rounds(labels: &[String]) -> Vec<RoundKey> {
    select(labels).rounds
}

pub fn select(labels: &[String]) -> Selection {
    let mut candidates: Vec<RoundKey> = Vec::new();
    for label in labels {
        if label.to_lowercase().contains("group") || is_third_place(label) {
            continue;
        }
        let key = RoundKey::new(strip_leg_suffix(label));
        if key.label.is_empty() || candidates.iter().any(|k| k.label.eq_ignore_ascii_case(&key.label)) {
            continue;
        }
        candidates.push(key);
    }

    // Stable: equal ranks keep first-seen order.
    candidates.sort_by_key(|k| k.rank);
    let split = candidates.partition_point(|k| k.rank == UNRANKED);
    let ranked = candidates.split_off(split);
    let unranked = candidates;

    if ranked.iter().any(|k| k.rank >= ROUND_OF_16) {
        return Selection { rounds: ranked, fallback: false };
    }

    // Knockout rounds first. Unranked labels only fill the gap, taking the ones listed
    // last since they sit closest to the ranked rounds.
    let fallback = ranked.len() > FALLBACK_ROUNDS || (ranked.len() < FALLBACK_ROUNDS && !unranked.is_empty());
    let mut rounds = if ranked.is_empty() {
        unranked.into_iter().take(FALLBACK_ROUNDS).collect()
    } else {
        let fill = FALLBACK_ROUNDS.saturating_sub(ranked.len()).min(unranked.len());
        let mut rounds: Vec<RoundKey> = unranked[unranked.len() - fill..].to_vec();
        rounds.extend(ranked);
        rounds
    };
    rounds.truncate(FALLBACK_ROUNDS);
    Selection { rounds, fallback }
}

/// "Round of 16 - 1st Leg" -> "Round of 16". Labels without a leg suffix come back trimmed.
pub fn strip_leg_suffix(label: &str) -> &str {
    let trimmed = label.trim();
    // ASCII lowercasing keeps byte offsets aligned with `trimmed`.
    let lower = trimmed.to_ascii_lowercase();
    match lower.rfind(" - ") {
        Some(idx) if lower[idx..].contains("leg") => trimmed[..idx].trim_end(),
        _ => trimmed,
    }
}

/// Third-place play-offs sit outside the bracket even though they classify as a final.
pub fn is_third_place(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.contains("3rd place") || lower.contains("third place")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classify_covers_every_stage() {
        assert_eq!(classify("Final"), FINAL);
        assert_eq!(classify("Grand Final"), FINAL);
        assert_eq!(classify("Semi-finals"), SEMI_FINAL);
        assert_eq!(classify("1/2 Finals"), SEMI_FINAL);
        assert_eq!(classify("Quarter-finals - 1st Leg"), QUARTER_FINAL);
        assert_eq!(classify("1/4 Finals"), QUARTER_FINAL);
        assert_eq!(classify("Round of 16"), ROUND_OF_16);
        assert_eq!(classify("Knockout Round Play-offs"), ROUND_OF_16);
        assert_eq!(classify("Playoff Round"), ROUND_OF_16);
        assert_eq!(classify("1/8 Finals"), ROUND_OF_16);
        assert_eq!(classify("Round of 32"), ROUND_OF_32);
        assert_eq!(classify("1/16 Finals"), ROUND_OF_32);
        assert_eq!(classify("Round of 64"), ROUND_OF_64);
        assert_eq!(classify("1/32 Finals"), ROUND_OF_64);
        assert_eq!(classify("Group A - 3"), UNRANKED);
        assert_eq!(classify("League Stage - 1"), UNRANKED);
    }

    #[test]
    fn strip_leg_suffix_variants() {
        assert_eq!(strip_leg_suffix("Round of 16 - 1st Leg"), "Round of 16");
        assert_eq!(strip_leg_suffix("Semi-finals - 2nd leg "), "Semi-finals");
        assert_eq!(strip_leg_suffix("Final"), "Final");
        assert_eq!(strip_leg_suffix("Regular Season - 12"), "Regular Season - 12");
    }

    #[test]
    fn select_orders_ascending_and_drops_groups() {
        let sel = select(&labels(&[
            "Final",
            "Group A",
            "Semi-finals",
            "Round of 16",
            "League Stage - 8",
            "Quarter-finals",
        ]));
        let got: Vec<&str> = sel.rounds.iter().map(|k| k.label.as_str()).collect();
        assert_eq!(got, vec!["Round of 16", "Quarter-finals", "Semi-finals", "Final"]);
        assert!(!sel.fallback);
    }

    #[test]
    fn select_merges_legs_of_one_round() {
        let got = select_rounds(&labels(&[
            "Round of 16 - 1st Leg",
            "Round of 16 - 2nd Leg",
            "Round of 16",
        ]));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].label, "Round of 16");
    }

    #[test]
    fn select_excludes_third_place_match() {
        let got = select_rounds(&labels(&["Semi-finals", "3rd Place Final", "Final"]));
        let got: Vec<&str> = got.iter().map(|k| k.label.as_str()).collect();
        assert_eq!(got, vec!["Semi-finals", "Final"]);
    }

    #[test]
    fn only_group_labels_select_nothing() {
        let sel = select(&labels(&["Group A", "Group B"]));
        assert!(sel.rounds.is_empty());
        assert!(!sel.fallback);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_rounds(&[]).is_empty());
    }

    #[test]
    fn small_cup_without_ranked_rounds_takes_first_four() {
        let sel = select(&labels(&["1st Round", "2nd Round", "3rd Round", "4th Round", "5th Round"]));
        assert!(sel.fallback);
        let got: Vec<&str> = sel.rounds.iter().map(|k| k.label.as_str()).collect();
        assert_eq!(got, vec!["1st Round", "2nd Round", "3rd Round", "4th Round"]);
    }

    #[test]
    fn fallback_keeps_every_ranked_round() {
        let sel = select(&labels(&[
            "Preliminary Round",
            "1st Qualifying Round",
            "2nd Qualifying Round",
            "3rd Qualifying Round",
            "Round of 64",
            "Round of 32",
        ]));
        assert!(sel.fallback);
        let got: Vec<(&str, u8)> = sel.rounds.iter().map(|k| (k.label.as_str(), k.rank)).collect();
        assert_eq!(
            got,
            vec![
                ("2nd Qualifying Round", UNRANKED),
                ("3rd Qualifying Round", UNRANKED),
                ("Round of 64", ROUND_OF_64),
                ("Round of 32", ROUND_OF_32),
            ]
        );
    }

    #[test]
    fn ranked_rounds_below_sixteen_alone_are_not_a_fallback() {
        let sel = select(&labels(&["Round of 64", "Round of 32"]));
        assert!(!sel.fallback);
        assert_eq!(sel.rounds.len(), 2);
    }

    #[test]
    fn third_place_labels() {
        assert!(is_third_place("3rd Place Final"));
        assert!(is_third_place("Match for Third Place"));
        assert!(!is_third_place("Final"));
    }

    #[test]
    fn selection_is_monotonic_in_rank() {
        let sel = select_rounds(&labels(&[
            "Final",
            "Round of 64",
            "Quarter-finals",
            "Round of 32",
            "Semi-finals",
            "Round of 16",
        ]));
        assert!(sel.windows(2).all(|w| w[0].rank <= w[1].rank));
        assert_eq!(sel.len(), 6);
    }
}
