use crate::app::MenuItem;
use chrono::{DateTime, Local};
use cup_api::{Bracket, BracketRound, Fixture, Tie};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    pub bracket: Bracket,
    /// Every fixture of the last snapshot by id, so a tie's legs can be shown.
    pub fixtures: HashMap<u64, Fixture>,
    /// Index into `bracket.rounds` the user has navigated to.
    pub view_round: usize,
    /// Index into the viewed round's top-then-bottom tie sequence.
    pub selected_tie: usize,
    pub loaded: bool,
}

impl BracketState {
    /// Store a freshly assembled bracket.
    ///
    /// A first load jumps to the latest round that has real ties. A refresh keeps the
    /// current position, clamped to the new shape.
    pub fn load(&mut self, bracket: Bracket, fixtures: Vec<Fixture>, keep_selection: bool) {
        self.fixtures = fixtures.into_iter().map(|f| (f.id, f)).collect();
        self.bracket = bracket;

        if !keep_selection || !self.loaded {
            self.view_round = latest_active_round(&self.bracket);
            self.selected_tie = 0;
        }
        self.loaded = true;
        self.clamp();
    }

    pub fn navigate_round_next(&mut self) {
        if self.view_round + 1 < self.bracket.rounds.len() {
            self.view_round += 1;
            self.selected_tie = 0;
        }
    }

    pub fn navigate_round_prev(&mut self) {
        if self.view_round > 0 {
            self.view_round -= 1;
            self.selected_tie = 0;
        }
    }

    pub fn navigate_tie_down(&mut self) {
        let max = self.ties_in_view().saturating_sub(1);
        if self.selected_tie < max {
            self.selected_tie += 1;
        }
    }

    pub fn navigate_tie_up(&mut self) {
        self.selected_tie = self.selected_tie.saturating_sub(1);
    }

    pub fn current_round(&self) -> Option<&BracketRound> {
        self.bracket.rounds.get(self.view_round)
    }

    pub fn selected(&self) -> Option<&Tie> {
        self.current_round()?
            .ties()
            .nth(self.selected_tie)
            .map(|s| &s.tie)
    }

    /// Legs of `tie` in kickoff order; unknown kickoffs sort last.
    pub fn legs_of(&self, tie: &Tie) -> Vec<&Fixture> {
        let mut legs: Vec<&Fixture> = tie.legs.iter().filter_map(|id| self.fixtures.get(id)).collect();
        legs.sort_by_key(|f| (f.kickoff.is_none(), f.kickoff, f.id));
        legs
    }

    fn ties_in_view(&self) -> usize {
        self.current_round().map(|r| r.ties().count()).unwrap_or(0)
    }

    fn clamp(&mut self) {
        let rounds = self.bracket.rounds.len();
        if self.view_round >= rounds {
            self.view_round = rounds.saturating_sub(1);
        }
        let max = self.ties_in_view().saturating_sub(1);
        if self.selected_tie > max {
            self.selected_tie = max;
        }
    }
}

/// The last round holding at least one real tie, or the first round.
fn latest_active_round(bracket: &Bracket) -> usize {
    bracket
        .rounds
        .iter()
        .rposition(|r| r.real_ties().next().is_some())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub bracket: BracketState,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
