//! Bracket positioning: top/bottom halves, feeder adjacency, column slots.

use crate::aggregate::sort_natural;
use crate::Tie;

/// Columns in the logical grid.
pub const GRID_COLUMNS: usize = 4;

/// Split a round into halves. The top half takes the extra tie when the count is odd.
pub fn split_half(ties: Vec<Tie>) -> (Vec<Tie>, Vec<Tie>) {
    let mut top = ties;
    let bottom = top.split_off(top.len().div_ceil(2));
    (top, bottom)
}

/// Occupied grid columns for a round-half holding `n` ties.
pub fn slot_columns(n: usize) -> Vec<u8> {
    match n {
        4 => vec![0, 1, 2, 3],
        2 => vec![1, 3],
        1 => vec![2],
        _ => (0..n.min(GRID_COLUMNS) as u8).collect(),
    }
}

/// Order `current` so each tie sits next to the later-round tie it feeds.
///
/// A tie feeds the first tie in `next` that shares a participant with it. Buckets follow
/// `next` order; within a bucket ties are in natural order. Ties that feed nothing trail
/// at the end in natural order. Without a next round the natural order is used.
pub fn reorder(current: Vec<Tie>, next: Option<&[Tie]>) -> Vec<Tie> {
    let mut current = current;
    sort_natural(&mut current);

    let Some(next) = next.filter(|n| !n.is_empty()) else {
        return current;
    };

    // Bucket index per current tie; `next.len()` is the trailing bucket.
    let mut buckets: Vec<Vec<Tie>> = vec![Vec::new(); next.len() + 1];
    for tie in current {
        let idx = next
            .iter()
            .position(|n| feeds(&tie, n))
            .unwrap_or(next.len());
        buckets[idx].push(tie);
    }

    buckets.into_iter().flatten().collect()
}

/// Whether `earlier` produced a participant of `later`. Placeholders feed and are fed by nothing.
pub fn feeds(earlier: &Tie, later: &Tie) -> bool {
    if earlier.is_placeholder() || later.is_placeholder() {
        return false;
    }
    later.involves(earlier.left.id) || later.involves(earlier.right.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Team;

    fn tie(a: u32, b: u32) -> Tie {
        Tie {
            left: Team::new(a, format!("T{a}")),
            right: Team::new(b, format!("T{b}")),
            left_aggregate: 0,
            right_aggregate: 0,
            legs: vec![u64::from(a) * 1000 + u64::from(b)],
        }
    }

    fn pairs(ties: &[Tie]) -> Vec<(u32, u32)> {
        ties.iter().map(Tie::pair).collect()
    }

    #[test]
    fn slot_columns_fixed_table() {
        assert_eq!(slot_columns(4), vec![0, 1, 2, 3]);
        assert_eq!(slot_columns(2), vec![1, 3]);
        assert_eq!(slot_columns(1), vec![2]);
        assert_eq!(slot_columns(3), vec![0, 1, 2]);
        assert_eq!(slot_columns(0), Vec::<u8>::new());
        assert_eq!(slot_columns(8), vec![0, 1, 2, 3]);
    }

    #[test]
    fn split_half_even_and_odd() {
        let (top, bottom) = split_half(vec![tie(1, 2), tie(3, 4), tie(5, 6), tie(7, 8)]);
        assert_eq!(pairs(&top), vec![(1, 2), (3, 4)]);
        assert_eq!(pairs(&bottom), vec![(5, 6), (7, 8)]);

        let (top, bottom) = split_half(vec![tie(1, 2), tie(3, 4), tie(5, 6)]);
        assert_eq!(top.len(), 2);
        assert_eq!(bottom.len(), 1);

        let (top, bottom) = split_half(Vec::new());
        assert!(top.is_empty() && bottom.is_empty());
    }

    #[test]
    fn reorder_without_next_round_is_natural_order() {
        let got = reorder(vec![tie(9, 10), tie(1, 2), tie(5, 6)], None);
        assert_eq!(pairs(&got), vec![(1, 2), (5, 6), (9, 10)]);
    }

    #[test]
    fn reorder_groups_feeders_next_to_their_parent() {
        // R16 ties 3 and 4 feed QF tie 1; ties 1 and 2 feed QF tie 2.
        let r16 = vec![tie(1, 2), tie(3, 4), tie(5, 6), tie(7, 8)];
        let qf = vec![tie(5, 8), tie(1, 3)];
        let got = reorder(r16, Some(qf.as_slice()));
        assert_eq!(pairs(&got), vec![(5, 6), (7, 8), (1, 2), (3, 4)]);
    }

    #[test]
    fn reorder_uses_overlap_not_index() {
        let r16 = vec![tie(7, 8), tie(1, 2), tie(5, 6), tie(3, 4)];
        let qf = vec![tie(6, 7), tie(2, 4)];
        let got = reorder(r16, Some(qf.as_slice()));
        assert_eq!(pairs(&got), vec![(5, 6), (7, 8), (1, 2), (3, 4)]);
    }

    #[test]
    fn unmatched_ties_trail_in_natural_order() {
        let r16 = vec![tie(20, 21), tie(1, 2), tie(10, 11)];
        let qf = vec![tie(2, 99)];
        let got = reorder(r16, Some(qf.as_slice()));
        assert_eq!(pairs(&got), vec![(1, 2), (10, 11), (20, 21)]);
    }

    #[test]
    fn placeholders_feed_nothing() {
        let sf = tie(1, 4);
        assert!(feeds(&tie(1, 8), &sf));
        assert!(!feeds(&tie(2, 7), &sf));
        assert!(!feeds(&Tie::placeholder(), &sf));
        assert!(!feeds(&tie(1, 8), &Tie::placeholder()));
    }

    #[test]
    fn placeholder_next_round_does_not_capture_feeders() {
        let got = reorder(vec![tie(3, 4), tie(1, 2)], Some(&[Tie::placeholder()][..]));
        assert_eq!(pairs(&got), vec![(1, 2), (3, 4)]);
    }
}
