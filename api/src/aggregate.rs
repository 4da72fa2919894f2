//! Tie aggregation: a round's fixtures folded into one aggregate result per team pair.

use crate::{Fixture, RoundKey, Tie};
use std::collections::HashSet;

/// Group every fixture of `round` by unordered team pair and sum goals by team identity.
///
/// Ties come out in the order their pair was first seen in `fixtures`. Every fixture
/// passed in is trusted to be a genuine leg; repeated reports are summed here and
/// collapsed one layer up by [`distinct`].
pub fn aggregate(fixtures: &[Fixture], round: &RoundKey) -> Vec<Tie> {
    let mut ties: Vec<Tie> = Vec::new();

    for fixture in fixtures.iter().filter(|f| round.matches(&f.round)) {
        // Self-pairings cannot form a tie.
        if fixture.home.id == fixture.away.id {
            continue;
        }

        let pair = ordered_pair(fixture);
        let idx = match ties.iter().position(|t| (t.left.id, t.right.id) == pair) {
            Some(idx) => idx,
            None => {
                // Orientation is fixed once per group from the first leg seen.
                let (left, right) = if fixture.home.id < fixture.away.id {
                    (fixture.home.clone(), fixture.away.clone())
                } else {
                    (fixture.away.clone(), fixture.home.clone())
                };
                ties.push(Tie { left, right, left_aggregate: 0, right_aggregate: 0, legs: Vec::new() });
                ties.len() - 1
            }
        };

        add_leg(&mut ties[idx], fixture);
    }

    ties
}

/// Collapse ties sharing an unordered team pair. First seen wins; order is kept.
pub fn distinct(ties: Vec<Tie>) -> Vec<Tie> {
    let mut seen = HashSet::new();
    ties.into_iter().filter(|t| seen.insert(t.pair())).collect()
}

/// Natural order: left team ID ascending, right team ID as tiebreak.
pub fn sort_natural(ties: &mut [Tie]) {
    ties.sort_by_key(|t| (t.left.id, t.right.id));
}

fn ordered_pair(fixture: &Fixture) -> (u32, u32) {
    let (h, a) = (fixture.home.id, fixture.away.id);
    if h < a { (h, a) } else { (a, h) }
}

fn add_leg(tie: &mut Tie, fixture: &Fixture) {
    let home_goals = fixture.home_goals.unwrap_or(0);
    let away_goals = fixture.away_goals.unwrap_or(0);

    if fixture.home.id == tie.left.id {
        tie.left_aggregate = tie.left_aggregate.saturating_add(home_goals);
        tie.right_aggregate = tie.right_aggregate.saturating_add(away_goals);
    } else {
        tie.left_aggregate = tie.left_aggregate.saturating_add(away_goals);
        tie.right_aggregate = tie.right_aggregate.saturating_add(home_goals);
    }
    tie.legs.push(fixture.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Team;

    fn arsenal() -> Team {
        Team::new(42, "Arsenal")
    }

    fn real_madrid() -> Team {
        Team::new(541, "Real Madrid")
    }

    fn fixture(id: u64, round: &str, home: Team, away: Team, hg: Option<u32>, ag: Option<u32>) -> Fixture {
        Fixture { id, round: round.into(), home, away, home_goals: hg, away_goals: ag, kickoff: None }
    }

    #[test]
    fn two_legs_merge_by_team_identity() {
        let fixtures = vec![
            fixture(1, "Round of 16", arsenal(), real_madrid(), Some(3), Some(1)),
            fixture(2, "Round of 16 - 2nd Leg", real_madrid(), arsenal(), Some(0), Some(2)),
        ];
        let ties = aggregate(&fixtures, &RoundKey::new("Round of 16"));
        assert_eq!(ties.len(), 1);
        let tie = &ties[0];
        assert_eq!(tie.left.id, 42);
        assert_eq!(tie.right.id, 541);
        assert_eq!((tie.left_aggregate, tie.right_aggregate), (5, 1));
        assert_eq!(tie.legs, vec![1, 2]);
    }

    #[test]
    fn swapping_home_and_away_on_a_leg_keeps_aggregate() {
        let round = RoundKey::new("Round of 16");
        let original = vec![
            fixture(1, "Round of 16", arsenal(), real_madrid(), Some(3), Some(1)),
            fixture(2, "Round of 16", real_madrid(), arsenal(), Some(0), Some(2)),
        ];
        let swapped = vec![
            fixture(1, "Round of 16", real_madrid(), arsenal(), Some(1), Some(3)),
            fixture(2, "Round of 16", real_madrid(), arsenal(), Some(0), Some(2)),
        ];
        let a = &aggregate(&original, &round)[0];
        let b = &aggregate(&swapped, &round)[0];
        assert_eq!((a.left_aggregate, a.right_aggregate), (b.left_aggregate, b.right_aggregate));
        assert_eq!(a.left.id, b.left.id);
    }

    #[test]
    fn canonical_orientation_when_larger_id_hosts_first() {
        let fixtures = vec![fixture(7, "Final", real_madrid(), arsenal(), Some(2), Some(0))];
        let tie = &aggregate(&fixtures, &RoundKey::new("Final"))[0];
        assert!(tie.left.id < tie.right.id);
        assert_eq!(tie.left.name, "Arsenal");
        assert_eq!((tie.left_aggregate, tie.right_aggregate), (0, 2));
    }

    #[test]
    fn absurd_goal_counts_saturate() {
        let fixtures = vec![
            fixture(1, "Final", arsenal(), real_madrid(), Some(u32::MAX), Some(0)),
            fixture(2, "Final", real_madrid(), arsenal(), Some(1), Some(5)),
        ];
        let tie = &aggregate(&fixtures, &RoundKey::new("Final"))[0];
        assert_eq!((tie.left_aggregate, tie.right_aggregate), (u32::MAX, 1));
    }

    #[test]
    fn third_place_fixture_stays_out_of_the_final() {
        let fixtures = vec![
            fixture(1, "3rd Place Final", arsenal(), real_madrid(), Some(2), Some(1)),
            fixture(2, "Final", Team::new(7, "Inter"), Team::new(9, "Milan"), Some(1), Some(0)),
        ];
        let ties = aggregate(&fixtures, &RoundKey::new("Final"));
        assert_eq!(ties.len(), 1);
        assert_eq!(ties[0].legs, vec![2]);
    }

    #[test]
    fn missing_goals_count_as_zero() {
        let fixtures = vec![
            fixture(1, "Semi-finals", arsenal(), real_madrid(), Some(1), Some(1)),
            fixture(2, "Semi-finals", real_madrid(), arsenal(), None, None),
        ];
        let tie = &aggregate(&fixtures, &RoundKey::new("Semi-finals"))[0];
        assert_eq!((tie.left_aggregate, tie.right_aggregate), (1, 1));
        assert_eq!(tie.legs.len(), 2);
    }

    #[test]
    fn duplicate_reports_are_summed_within_one_call() {
        let leg = fixture(1, "Final", arsenal(), real_madrid(), Some(1), Some(0));
        let ties = aggregate(&[leg.clone(), leg.clone(), leg], &RoundKey::new("Final"));
        assert_eq!(ties.len(), 1);
        assert_eq!(ties[0].left_aggregate, 3);
        assert_eq!(ties[0].legs, vec![1, 1, 1]);
    }

    #[test]
    fn fixtures_from_other_rounds_are_ignored() {
        let fixtures = vec![
            fixture(1, "Semi-finals", arsenal(), real_madrid(), Some(1), Some(0)),
            fixture(2, "Final", Team::new(5, "Inter"), Team::new(85, "PSG"), Some(0), Some(5)),
        ];
        let ties = aggregate(&fixtures, &RoundKey::new("Final"));
        assert_eq!(ties.len(), 1);
        assert_eq!(ties[0].pair(), (5, 85));
    }

    #[test]
    fn distinct_keeps_first_seen_and_is_idempotent() {
        let mut first = Tie::placeholder();
        first.left = arsenal();
        first.right = real_madrid();
        first.legs = vec![1];
        let mut dup = first.clone();
        dup.left_aggregate = 9;
        let mut other = first.clone();
        other.left = Team::new(1, "Other");

        let once = distinct(vec![first.clone(), dup, other]);
        assert_eq!(once.len(), 2);
        assert_eq!(once[0], first);
        let twice = distinct(once.clone());
        assert_eq!(once, twice);
    }
}
