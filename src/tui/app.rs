//! Application state for the TUI.
//!
//! [`App`] owns the aggregator and the projector. Every mutation happens on
//! the main loop through [`update`](super::event::update), so a window close
//! can never race a tick being appended.

use std::time::{Duration, Instant};

use ratatui::layout::Rect as CellRect;
use tracing::debug;

use crate::aggregator::{Aggregator, WindowPolicy};
use crate::models::{Candle, Tick};
use crate::projector::{Layout, Projection, Projector};

use super::components::chart::{ROW_PIXELS, viewport_pixels};

/// How long an error stays in the status bar.
const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    /// Instrument being charted.
    pub symbol: String,
    pub aggregator: Aggregator,
    pub projector: Projector,
    /// Geometry of the last render pass, `None` while the range is degenerate.
    pub projection: Option<Projection>,

    // -- Feed State --
    pub connection_status: ConnectionStatus,
    /// Whether the window timer has been requested.
    pub window_timer_started: bool,
    pub ticks_received: u64,
    /// When the last non-empty candle list arrived.
    pub last_emission: Option<Instant>,

    // -- UI State --
    /// Crosshair row within the chart area.
    pub crosshair_row: u16,
    /// Size of the chart area in cells.
    pub chart_cells: CellRect,
    /// Error message to display (clears after timeout).
    pub error_message: Option<ErrorDisplay>,

    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates an app charting `symbol` with the given aggregator.
    pub fn new(symbol: impl Into<String>, aggregator: Aggregator) -> Self {
        Self {
            symbol: symbol.into(),
            aggregator,
            projector: Projector::new(Layout::default()),
            projection: None,

            connection_status: ConnectionStatus::Connecting,
            window_timer_started: false,
            ticks_received: 0,
            last_emission: None,

            crosshair_row: 0,
            chart_cells: CellRect::default(),
            error_message: None,

            should_quit: false,
        }
    }

    /// Marks the subscription as confirmed.
    ///
    /// Returns `true` exactly once, when the caller should start the window
    /// timer.
    pub fn on_subscribed(&mut self) -> bool {
        self.connection_status = ConnectionStatus::Subscribed;
        let newly_armed = self.aggregator.arm();
        let needs_timer = newly_armed
            && !self.window_timer_started
            && self.aggregator.policy() == WindowPolicy::Timed;
        if needs_timer {
            self.window_timer_started = true;
        }
        needs_timer
    }

    /// Feeds a tick batch to the aggregator.
    pub fn ingest_ticks(&mut self, ticks: Vec<Tick>) {
        self.ticks_received += ticks.len() as u64;
        if let Some(emitted) = self.aggregator.ingest_all(ticks) {
            self.apply_emission(emitted);
        }
    }

    /// Closes the current window.
    pub fn close_window(&mut self) {
        if let Some(emitted) = self.aggregator.on_window_tick() {
            self.apply_emission(emitted);
        }
    }

    /// Hands an emitted candle list to the chart; an empty list is no update.
    fn apply_emission(&mut self, emitted: Vec<Candle>) {
        if emitted.is_empty() {
            debug!("No closed candles yet");
            return;
        }
        self.projector.replace_candles(emitted);
        self.last_emission = Some(Instant::now());
        self.refresh();
    }

    /// Re-projects the chart for the current state and viewport.
    pub fn refresh(&mut self) {
        self.projection = self.projector.project();
    }

    /// Adapts the viewport to a new chart area.
    pub fn resize(&mut self, chart_cells: CellRect) {
        self.chart_cells = chart_cells;
        self.crosshair_row = self
            .crosshair_row
            .min(chart_cells.height.saturating_sub(1));
        let (width, height) = viewport_pixels(chart_cells);
        self.projector.resize(width, height);
        self.refresh();
    }

    /// Scrolls by a whole number of candles; negative goes back in time.
    pub fn scroll_candles(&mut self, candles: i32) {
        let pitch = self.projector.layout().pitch();
        self.projector.scroll_by(candles as f32 * pitch);
        self.refresh();
    }

    pub fn scroll_home(&mut self) {
        self.projector.scroll_to(0.0);
        self.refresh();
    }

    pub fn scroll_end(&mut self) {
        self.projector.scroll_to_end();
        self.refresh();
    }

    pub fn move_crosshair(&mut self, rows: i32) {
        let max_row = i32::from(self.chart_cells.height.saturating_sub(1));
        let row = (i32::from(self.crosshair_row) + rows).clamp(0, max_row);
        self.crosshair_row = u16::try_from(row).unwrap_or(0);
    }

    /// Price under the crosshair, when the chart has a scale.
    pub fn crosshair_price(&self) -> Option<f32> {
        let scale = self.projection.as_ref()?.scale;
        let y = (f32::from(self.crosshair_row) + 0.5) * ROW_PIXELS;
        Some(scale.value_at(y))
    }

    /// Latest price of the open window.
    pub fn live_price(&self) -> Option<f32> {
        self.aggregator
            .current()
            .filter(|candle| !candle.is_empty())
            .map(Candle::close)
    }

    /// Sets an error message to display.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears error messages older than [`ERROR_DISPLAY_TIME`].
    pub fn clear_stale_errors(&mut self) {
        if let Some(ref error) = self.error_message
            && error.timestamp.elapsed() > ERROR_DISPLAY_TIME
        {
            self.error_message = None;
        }
    }
}

/// Feed connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Subscribed,
    Reconnecting,
}

impl ConnectionStatus {
    /// Returns a display string for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Subscribed => "Live",
            ConnectionStatus::Reconnecting => "Reconnecting...",
        }
    }
}

/// Error message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    /// The error message.
    pub message: String,
    /// When the error was shown.
    pub timestamp: Instant,
}
