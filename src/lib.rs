//! Live bid/ask quotes aggregated into a scrollable candlestick chart.
//!
//! Ticks arrive from a [`source::TickSource`] (the WebSocket quote stream or
//! an offline random walk), are grouped into fixed windows by the
//! [`aggregator`], and are laid out for drawing by the [`projector`], which
//! keeps the vertical scale stable across the whole history.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod models;
pub mod projector;
pub mod source;
pub mod tls;
pub mod tui;
pub mod websocket;

pub use error::{CandlewickError, Result};
