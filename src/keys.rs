use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Rounds),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket and rounds navigation share the same selection
        (MenuItem::Bracket | MenuItem::Rounds, Char('l') | KeyCode::Right, _) => guard.bracket_next_round(),
        (MenuItem::Bracket | MenuItem::Rounds, Char('h') | KeyCode::Left, _) => guard.bracket_prev_round(),
        (MenuItem::Bracket | MenuItem::Rounds, Char('j') | KeyCode::Down, _) => guard.bracket_tie_down(),
        (MenuItem::Bracket | MenuItem::Rounds, Char('k') | KeyCode::Up, _) => guard.bracket_tie_up(),

        // Global
        (_, Char('R'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadBracket).await;
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
