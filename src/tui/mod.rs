//! Terminal user interface for the candle chart.
//!
//! Provides the Ratatui-based rendering collaborator: it owns the chart
//! state, applies feed events on a single task and draws each projection.

pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
