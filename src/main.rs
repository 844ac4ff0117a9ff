use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use candlewick::aggregator::{Aggregator, WINDOW_DURATION, WindowPolicy};
use candlewick::config::{AppConfig, SourceKind, fetch_config};
use candlewick::source::{RandomWalk, TickSource};
use candlewick::tls::load_tls_config;
use candlewick::tui::event::{spawn_event_reader, spawn_tick_timer, spawn_window_timer, update};
use candlewick::tui::ui::chart_area;
use candlewick::tui::{Action, App, Message, render, restore_terminal, setup_terminal};
use candlewick::websocket::{ConnectionCommand, ConnectionManager};
use candlewick::{CandlewickError, Result};

/// UI housekeeping period.
const UI_TICK_MS: u64 = 250;

/// How long shutdown waits for the source to unsubscribe.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let log_file = File::create(&config.log_file).map_err(|e| {
        CandlewickError::Io(format!("failed to create {}: {e}", config.log_file.display()))
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = fetch_config()?;
    init_tracing(&config)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ConnectionCommand>();

    let feed = &config.feed;
    info!(symbol = %feed.symbol, source = ?feed.source, "Starting candlewick");
    let source = match feed.source {
        SourceKind::Live => {
            let tls = match &feed.ca_pem {
                Some(path) => Some(Arc::new(load_tls_config(path)?)),
                None => None,
            };
            let manager = ConnectionManager::new(
                feed.websocket_url.clone(),
                feed.symbol.clone(),
                tls,
                tx.clone(),
                cmd_rx,
            );
            tokio::spawn(manager.run())
        }
        SourceKind::Mock => tokio::spawn(RandomWalk::new(feed.symbol.clone(), tx.clone()).run()),
    };

    let aggregator = Aggregator::new(WindowPolicy::Timed).with_retention(config.max_candles);

    let mut terminal = setup_terminal()?;
    let mut app = App::new(feed.symbol.clone(), aggregator);
    let size = terminal
        .size()
        .map_err(|e| CandlewickError::Io(format!("failed to read terminal size: {e}")))?;
    app.resize(chart_area(Rect::new(0, 0, size.width, size.height)));

    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), UI_TICK_MS);
    let signal_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(Message::Quit);
        }
    });

    let outcome = run(&mut terminal, &mut app, &mut rx, &tx).await;

    restore_terminal(&mut terminal)?;

    let _ = cmd_tx.send(ConnectionCommand::Shutdown);
    drop(rx);
    if tokio::time::timeout(SHUTDOWN_GRACE, source).await.is_err() {
        warn!("Tick source did not stop in time");
    }
    info!("Shutdown complete");

    outcome
}

async fn run(
    terminal: &mut candlewick::tui::Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    tx: &mpsc::UnboundedSender<Message>,
) -> Result<()> {
    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| CandlewickError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            error!("Message channel closed");
            break;
        };
        if let Some(Action::StartWindowTimer) = update(app, message) {
            spawn_window_timer(tx.clone(), WINDOW_DURATION);
        }
    }
    Ok(())
}
