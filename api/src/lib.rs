pub mod aggregate;
pub mod apisports;
pub mod bracket;
pub mod client;
pub mod position;
pub mod rounds;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use bracket::{Bracket, BracketRound, Diagnostic, SlottedTie, assemble};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the API-Sports wire format
// ---------------------------------------------------------------------------

/// Display name used for both sides of a placeholder tie.
pub const TBD: &str = "TBD";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Sole grouping and tie-breaking key. 0 is reserved for placeholders.
    pub id: u32,
    pub name: String,
    pub logo: String, // URL as reported by the feed
}

impl Team {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), logo: String::new() }
    }

    pub fn tbd() -> Self {
        Self { id: 0, name: TBD.into(), logo: String::new() }
    }
}

/// One played or scheduled match, read-only input to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u64,
    /// Free text, e.g. "Round of 16" or "Semi-finals - 2nd Leg".
    pub round: String,
    pub home: Team,
    pub away: Team,
    pub home_goals: Option<u32>, // None before kickoff
    pub away_goals: Option<u32>,
    pub kickoff: Option<DateTime<Utc>>,
}

/// A classified round label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundKey {
    /// Label with any leg suffix stripped, in the feed's original casing.
    pub label: String,
    /// Higher = later stage. 0 = unranked.
    pub rank: u8,
}

impl RoundKey {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let rank = rounds::classify(&label);
        Self { label, rank }
    }

    /// Whether a fixture's raw round label belongs to this round.
    ///
    /// Case-insensitive containment, so "Round of 16 - 2nd Leg" matches "Round of 16".
    /// The raw label must also classify to the same rank: the key "Final" is contained
    /// in "Semi-finals" but the two are different rounds. Third-place matches never belong.
    pub fn matches(&self, raw_label: &str) -> bool {
        raw_label.to_lowercase().contains(&self.label.to_lowercase())
            && rounds::classify(raw_label) == self.rank
            && !rounds::is_third_place(raw_label)
    }
}

/// Which side of a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Aggregate result of every leg played between one pair of teams in one round.
///
/// `left` is always the team with the smaller ID, regardless of who hosted either leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tie {
    pub left: Team,
    pub right: Team,
    pub left_aggregate: u32,
    pub right_aggregate: u32,
    /// Contributing fixture IDs in input order. Empty for placeholders.
    pub legs: Vec<u64>,
}

impl Tie {
    /// "TBD" vs "TBD", 0-0. Keeps the grid shape when real data is missing.
    pub fn placeholder() -> Self {
        Self {
            left: Team::tbd(),
            right: Team::tbd(),
            left_aggregate: 0,
            right_aggregate: 0,
            legs: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.legs.is_empty()
    }

    /// Unordered team pair, normalised to (smaller, larger).
    pub fn pair(&self) -> (u32, u32) {
        let (a, b) = (self.left.id, self.right.id);
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.left.id == team_id || self.right.id == team_id
    }

    /// Side currently ahead on aggregate. None when level or a placeholder.
    pub fn leader(&self) -> Option<Side> {
        if self.is_placeholder() {
            return None;
        }
        match self.left_aggregate.cmp(&self.right_aggregate) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn aggregate(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_aggregate,
            Side::Right => self.right_aggregate,
        }
    }
}

/// (round index, column index) in the logical 4-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub round: usize,
    pub column: u8, // 0..=3
}

/// Inputs for one engine run, as supplied by the fetch layer.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub fixtures: Vec<Fixture>,
    pub round_labels: Vec<String>,
}

impl Snapshot {
    /// Build a snapshot whose round labels are the distinct fixture labels, first-seen order.
    pub fn from_fixtures(fixtures: Vec<Fixture>) -> Self {
        let mut round_labels: Vec<String> = Vec::new();
        for f in &fixtures {
            if !round_labels.contains(&f.round) {
                round_labels.push(f.round.clone());
            }
        }
        Self { fixtures, round_labels }
    }

    pub fn assemble(&self) -> Bracket {
        assemble(&self.fixtures, &self.round_labels)
    }
}
