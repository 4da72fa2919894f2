mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliMode {
    Tui,
    Json,
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = handle_cli_args();
    if mode == CliMode::Exit {
        return Ok(());
    }

    let settings = AppSettings::load();

    if mode == CliMode::Json {
        return print_bracket_json(&settings).await;
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let level = settings.log_level();
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);

    let refresh_secs = settings.refresh_secs;
    let network_worker_settings = settings.clone();
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(&network_worker_settings, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic snapshot refresh thread
    let periodic_task = PeriodicRefresher::new(network_req_tx.clone(), refresh_secs)
        .map(|refresher| tokio::spawn(refresher.run()));

    // Trigger bracket load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }

    Ok(())
}

fn handle_cli_args() -> CliMode {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return CliMode::Tui;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliMode::Exit
        }
        "-V" | "--version" => {
            println!("cuptui {}", env!("CARGO_PKG_VERSION"));
            CliMode::Exit
        }
        "--json" => CliMode::Json,
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "cuptui - knockout cup bracket terminal UI

Usage:
  cuptui
  cuptui --json
  cuptui --help
  cuptui --version

Options:
  --json   Fetch once and print the assembled bracket as JSON

Config:
  $XDG_CONFIG_HOME/cuptui/config.json (or ~/.config/cuptui/config.json)

Environment:
  CUPTUI_LEAGUE         API-Sports league id (default 2, UEFA Champions League)
  CUPTUI_SEASON         Season start year (default: current season)
  CUPTUI_API_KEY        API-Sports key, sent as x-apisports-key
  CUPTUI_API_URL        API base URL override
  CUPTUI_REFRESH_SECS   Refresh period in seconds, 0 disables (default 60)
  CUPTUI_LOG_LEVEL      error | warn | info | debug | trace
  CUPTUI_FIXTURES_JSON  Path to a local API-Sports fixtures document"
}

async fn print_bracket_json(settings: &AppSettings) -> anyhow::Result<()> {
    let snapshot = settings
        .api()
        .fetch_snapshot(settings.league, settings.season())
        .await?;
    let bracket = snapshot.assemble();
    println!("{}", serde_json::to_string_pretty(&bracket)?);
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadBracket).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::SnapshotLoaded { snapshot, refresh } => {
            let mut guard = app.lock().await;
            guard.on_snapshot_loaded(snapshot, refresh);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
