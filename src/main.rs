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
use crate::state::ticker::ClockTicker;
use chrono::Utc;
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use match_api::client::MatchStoreClient;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(match_id) = handle_cli_args() else {
        return Ok(());
    };

    better_panic::install();

    let settings = AppSettings::load();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);
    info!("match store at {}", settings.api_url);

    let client = MatchStoreClient::with_base_url(settings.api_url.clone());
    let app = Arc::new(Mutex::new(App::new(settings, match_id.clone())));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Clock ticks are started and stopped by the UI loop as the match runs.
    let ticker = ClockTicker::new(ui_event_tx.clone());

    // Trigger match load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ticker, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

/// Returns the match id to operate, or `None` when the process should exit.
fn handle_cli_args() -> Option<String> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        eprintln!("{}", usage_text());
        std::process::exit(2);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            None
        }
        "-V" | "--version" => {
            println!("livescore {}", env!("CARGO_PKG_VERSION"));
            None
        }
        flag if flag.starts_with('-') => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
        _ => Some(arg),
    }
}

fn usage_text() -> &'static str {
    "livescore - live match operator console

Usage:
  livescore <MATCH_ID>
  livescore --help
  livescore --version

Environment:
  LIVESCORE_API_URL     Match Store base URL (default http://127.0.0.1:8000/api)
  LIVESCORE_LOG_LEVEL   error | warn | info | debug | trace (default info)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ticker: ClockTicker,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                handle_ui_event(ui_event, &app, &ticker, &network_requests).await;
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &mut loading).await;
            }

            else => break,
        }

        let mut app_guard = app.lock().await;
        ticker.sync(app_guard.needs_ticker(), app_guard.period_starts());
        draw::draw(&mut terminal, &mut app_guard, loading);
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    ticker: &ClockTicker,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match ui_event {
        UiEvent::AppStarted => {
            let match_id = app.lock().await.state.match_id.clone();
            let _ = network_requests.send(NetworkRequest::LoadMatch { match_id }).await;
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
        }
        UiEvent::Resize => {}
        UiEvent::ClockTick { generation } => {
            if !ticker.accepts(generation) {
                return;
            }
            let mut guard = app.lock().await;
            let requests = guard.on_clock_tick();
            guard.state.in_flight += requests.len();
            drop(guard);
            keys::forward_requests(requests, network_requests).await;
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::MatchLoaded { record } => {
            let mut guard = app.lock().await;
            guard.on_match_loaded(record, Utc::now());
        }
        NetworkResponse::Acknowledged { action } => {
            let mut guard = app.lock().await;
            guard.on_acknowledged(action);
        }
        NetworkResponse::Error { action, message } => {
            error!("{action} failed: {message}");
            let mut guard = app.lock().await;
            guard.on_store_error(action, message);
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let Ok(event) = tokio::task::spawn_blocking(crossterm_event::read).await else {
            break;
        };
        if let Ok(event) = event {
            let ui_event = match event {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    Some(UiEvent::KeyPressed(key_event))
                }
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
