use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::Local;
use cup_api::{Diagnostic, Snapshot};
use log::{debug, info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Rounds,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Network response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Rebuild the bracket from scratch for every snapshot.
    pub fn on_snapshot_loaded(&mut self, snapshot: Snapshot, refresh: bool) {
        let bracket = snapshot.assemble();
        for diagnostic in &bracket.diagnostics {
            log_diagnostic(diagnostic);
        }
        info!(
            "bracket assembled: {} rounds, {} ties",
            bracket.rounds.len(),
            bracket.real_tie_count()
        );

        self.state.last_error = None;
        self.state.last_updated = Some(Local::now());
        self.state.bracket.load(bracket, snapshot.fixtures, refresh);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Bracket navigation: delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        self.state.bracket.navigate_round_next();
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket.navigate_round_prev();
    }

    pub fn bracket_tie_down(&mut self) {
        self.state.bracket.navigate_tie_down();
    }

    pub fn bracket_tie_up(&mut self) {
        self.state.bracket.navigate_tie_up();
    }
}

fn log_diagnostic(diagnostic: &Diagnostic) {
    match diagnostic {
        Diagnostic::RoundFallback { rounds } => {
            warn!("no round reached the round of 16, using: {}", rounds.join(", "))
        }
        Diagnostic::FinalTruncated { round, dropped } => {
            warn!("{round}: kept the first tie, dropped {dropped}")
        }
        Diagnostic::HalfOverflow { round, dropped } => {
            warn!("{round}: {dropped} ties do not fit the grid")
        }
        Diagnostic::PlaceholderPadding { round, count } => {
            debug!("{round}: padded with {count} placeholder ties")
        }
    }
}
