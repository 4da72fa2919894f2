use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use cup_api::Snapshot;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadBracket,
    /// Periodic re-fetch; the bracket is rebuilt but the selection is kept.
    RefreshBracket,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SnapshotLoaded { snapshot: Snapshot, refresh: bool },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
