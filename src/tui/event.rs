//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::source::FeedEvent;

use super::app::{App, ConnectionStatus};
use super::ui::chart_area;

/// Events that can occur in the terminal.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI housekeeping.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// Event from the tick source.
    Feed(FeedEvent),
    /// The aggregation window elapsed.
    WindowTick,
    /// Request to quit the application.
    Quit,
}

/// Actions that require the main loop's resources.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Start the periodic window timer.
    StartWindowTimer,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic UI tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Spawns the window timer.
///
/// The first tick fires immediately and opens the first window; after that
/// one window closes every `period`.
pub fn spawn_window_timer(tx: mpsc::UnboundedSender<Message>, period: Duration) {
    info!(period_secs = period.as_secs(), "Starting window timer");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if tx.send(Message::WindowTick).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => {
            handle_input(app, event);
            None
        }
        Message::Feed(event) => handle_feed(app, event),
        Message::WindowTick => {
            app.close_window();
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Applies a tick source event.
fn handle_feed(app: &mut App, event: FeedEvent) -> Option<Action> {
    match event {
        FeedEvent::Connected => {
            app.connection_status = ConnectionStatus::Connected;
            None
        }
        FeedEvent::Subscribed => app.on_subscribed().then_some(Action::StartWindowTimer),
        FeedEvent::Ticks(ticks) => {
            app.ingest_ticks(ticks);
            None
        }
        FeedEvent::Disconnected => {
            warn!(symbol = %app.symbol, "Feed disconnected");
            app.connection_status = ConnectionStatus::Reconnecting;
            app.show_error("connection lost");
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(width, height) => app.resize(chart_area(Rect::new(0, 0, width, height))),
        Event::Tick => app.clear_stale_errors(),
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Left | KeyCode::Char('h') => app.scroll_candles(-1),
        KeyCode::Right | KeyCode::Char('l') => app.scroll_candles(1),
        KeyCode::PageUp => app.scroll_candles(-10),
        KeyCode::PageDown => app.scroll_candles(10),
        KeyCode::Home => app.scroll_home(),
        KeyCode::End => app.scroll_end(),
        KeyCode::Up | KeyCode::Char('k') => app.move_crosshair(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_crosshair(1),
        _ => {}
    }
}
