//! Bracket assembly: classified rounds, aggregated ties and grid slots composed into
//! one positioned structure for a renderer.

use crate::aggregate::{aggregate, distinct};
use crate::position::{GRID_COLUMNS, reorder, slot_columns, split_half};
use crate::rounds;
use crate::{BracketSlot, Fixture, RoundKey, Tie};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlottedTie {
    pub slot: BracketSlot,
    pub tie: Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketRound {
    pub key: RoundKey,
    pub top: Vec<SlottedTie>,
    /// Always empty for the terminal round.
    pub bottom: Vec<SlottedTie>,
}

impl BracketRound {
    pub fn ties(&self) -> impl Iterator<Item = &SlottedTie> {
        self.top.iter().chain(self.bottom.iter())
    }

    pub fn real_ties(&self) -> impl Iterator<Item = &Tie> {
        self.ties().map(|s| &s.tie).filter(|t| !t.is_placeholder())
    }
}

/// Places where the engine quietly reshaped its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// No label reached the Round of 16; these rounds were taken instead.
    RoundFallback { rounds: Vec<String> },
    /// The terminal round reported more than one tie; only the first was kept.
    FinalTruncated { round: String, dropped: usize },
    /// A round-half held more ties than the grid has columns.
    HalfOverflow { round: String, dropped: usize },
    /// Placeholder ties were added to keep a round-half's shape.
    PlaceholderPadding { round: String, count: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bracket {
    /// Earliest stage first; the last entry is the terminal round.
    pub rounds: Vec<BracketRound>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Bracket {
    /// Zero rounds: nothing in the input looked like a knockout stage.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn terminal(&self) -> Option<&BracketRound> {
        self.rounds.last()
    }

    /// True when the last round is a Final: a single tie with no bottom half.
    pub fn reaches_final(&self) -> bool {
        self.terminal().is_some_and(|r| r.key.rank == rounds::FINAL)
    }

    pub fn real_tie_count(&self) -> usize {
        self.rounds.iter().map(|r| r.real_ties().count()).sum()
    }
}

/// Build the full positioned bracket from one fixture snapshot.
///
/// Pure: identical inputs, in identical order, give an identical bracket.
pub fn assemble(fixtures: &[Fixture], round_labels: &[String]) -> Bracket {
    let mut diagnostics = Vec::new();

    let selection = rounds::select(round_labels);
    if selection.fallback {
        diagnostics.push(Diagnostic::RoundFallback {
            rounds: selection.rounds.iter().map(|k| k.label.clone()).collect(),
        });
    }
    let keys = selection.rounds;
    if keys.is_empty() {
        return Bracket { rounds: Vec::new(), diagnostics };
    }

    let mut aggregated: Vec<Vec<Tie>> =
        keys.iter().map(|k| distinct(aggregate(fixtures, k))).collect();

    // Walk back from the last round so every round is bucketed against the final
    // order of the round it feeds.
    let last = keys.len() - 1;
    let mut ordered: Vec<Vec<Tie>> = vec![Vec::new(); keys.len()];
    for i in (0..=last).rev() {
        let ties = std::mem::take(&mut aggregated[i]);
        let mut ties = reorder(ties, ordered.get(i + 1).map(Vec::as_slice));
        if keys[i].rank == rounds::FINAL && ties.len() > 1 {
            diagnostics.push(Diagnostic::FinalTruncated {
                round: keys[i].label.clone(),
                dropped: ties.len() - 1,
            });
            ties.truncate(1);
        }
        ordered[i] = ties;
    }

    let rounds = keys
        .into_iter()
        .zip(ordered)
        .enumerate()
        .map(|(i, (key, ties))| {
            let expected = expected_per_half(key.rank);
            if key.rank == rounds::FINAL {
                let top = place(i, &key, ties, expected, &mut diagnostics);
                return BracketRound { key, top, bottom: Vec::new() };
            }
            let (top, bottom) = split_half(ties);
            let top = place(i, &key, top, expected, &mut diagnostics);
            let bottom = place(i, &key, bottom, expected, &mut diagnostics);
            BracketRound { key, top, bottom }
        })
        .collect();

    Bracket { rounds, diagnostics }
}

/// Ties per round-half by stage: one at the semi-final and final, two at the
/// quarter-finals, a full column anywhere earlier.
fn expected_per_half(rank: u8) -> usize {
    match rank {
        rounds::FINAL | rounds::SEMI_FINAL => 1,
        rounds::QUARTER_FINAL => 2,
        _ => GRID_COLUMNS,
    }
}

fn place(
    round: usize,
    key: &RoundKey,
    mut ties: Vec<Tie>,
    expected: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<SlottedTie> {
    if ties.len() > GRID_COLUMNS {
        diagnostics.push(Diagnostic::HalfOverflow {
            round: key.label.clone(),
            dropped: ties.len() - GRID_COLUMNS,
        });
        ties.truncate(GRID_COLUMNS);
    }
    if ties.len() < expected {
        diagnostics.push(Diagnostic::PlaceholderPadding {
            round: key.label.clone(),
            count: expected - ties.len(),
        });
        ties.resize(expected, Tie::placeholder());
    }

    let columns = slot_columns(ties.len());
    ties.into_iter()
        .zip(columns)
        .map(|(tie, column)| SlottedTie { slot: BracketSlot { round, column }, tie })
        .collect()
}
