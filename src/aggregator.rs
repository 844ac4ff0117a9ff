//! Streaming tick-to-candle aggregation.
//!
//! [`Aggregator`] owns the candle history and the currently open window.
//! Ticks always land in the last candle; windows only advance when
//! [`Aggregator::on_window_tick`] fires (or, under [`WindowPolicy::Ticks`],
//! when the open window has collected enough ticks). Closing a window seeds
//! the next one with the previous close so adjacent candles join up.

use std::num::NonZeroUsize;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::models::{Candle, Tick};

/// Length of one aggregation window.
pub const WINDOW_DURATION: Duration = Duration::from_secs(60);

/// What closes a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Only the external window timer closes windows.
    #[default]
    Timed,
    /// A window closes once it holds this many ticks that really arrived in
    /// it. `Ticks(1)` draws one bar per tick.
    Ticks(NonZeroUsize),
}

/// Lifecycle of the aggregator relative to the feed subscription.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregatorState {
    /// No subscription confirmed yet; every call is a no-op.
    #[default]
    Idle,
    /// Subscribed; ticks go to the open window.
    Armed,
}

/// Tick-to-candle state machine.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: AggregatorState,
    policy: WindowPolicy,
    /// Closed candles followed by the open one.
    candles: Vec<Candle>,
    next_window: u64,
    max_candles: Option<usize>,
}

impl Aggregator {
    #[must_use]
    pub fn new(policy: WindowPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Keeps at most `cap` closed candles, dropping the oldest.
    #[must_use]
    pub fn with_retention(mut self, cap: usize) -> Self {
        self.max_candles = Some(cap.max(1));
        self
    }

    #[must_use]
    pub fn state(&self) -> AggregatorState {
        self.state
    }

    #[must_use]
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Marks the subscription as confirmed.
    ///
    /// Returns `true` only on the transition out of [`AggregatorState::Idle`],
    /// so duplicate confirmations can be ignored by the caller.
    pub fn arm(&mut self) -> bool {
        if self.state == AggregatorState::Armed {
            return false;
        }
        self.state = AggregatorState::Armed;
        info!(policy = ?self.policy, "Aggregator armed");
        true
    }

    /// The window ticks are currently appended to.
    #[must_use]
    pub fn current(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Every retained candle, including the open one.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Appends a tick to the open window.
    ///
    /// Returns the emitted candle list when this tick completed a
    /// [`WindowPolicy::Ticks`] window; always `None` under
    /// [`WindowPolicy::Timed`].
    pub fn ingest(&mut self, tick: Tick) -> Option<Vec<Candle>> {
        if self.state == AggregatorState::Idle {
            trace!(symbol = %tick.symbol, "Dropping tick before subscription");
            return None;
        }

        if self.candles.is_empty() {
            match self.policy {
                WindowPolicy::Timed => {
                    trace!(symbol = %tick.symbol, "Dropping tick before first window");
                    return None;
                }
                WindowPolicy::Ticks(_) => self.open_window(),
            }
        }

        let current = self.candles.last_mut()?;
        current.push(tick);
        let filled = current.real_tick_count();

        match self.policy {
            WindowPolicy::Ticks(n) if filled >= n.get() => {
                Some(self.close_window())
            }
            _ => None,
        }
    }

    /// Ingests a whole batch, returning the last emission it produced.
    pub fn ingest_all(&mut self, ticks: impl IntoIterator<Item = Tick>) -> Option<Vec<Candle>> {
        ticks
            .into_iter()
            .fold(None, |emitted, tick| self.ingest(tick).or(emitted))
    }

    /// Closes the open window and opens the next one.
    ///
    /// Returns `None` while idle. Otherwise returns every retained candle
    /// that holds at least one tick, oldest first; an empty list means
    /// there is nothing to draw yet.
    pub fn on_window_tick(&mut self) -> Option<Vec<Candle>> {
        if self.state == AggregatorState::Idle {
            debug!("Window tick before subscription, ignoring");
            return None;
        }
        Some(self.close_window())
    }

    fn close_window(&mut self) -> Vec<Candle> {
        if let Some(cap) = self.max_candles
            && self.candles.len() > cap
        {
            let excess = self.candles.len() - cap;
            self.candles.drain(..excess);
            debug!(dropped = excess, "Trimmed candle history");
        }

        let emitted: Vec<Candle> = self
            .candles
            .iter()
            .filter(|candle| !candle.is_empty())
            .cloned()
            .collect();

        self.open_window();

        debug!(
            emitted = emitted.len(),
            window = self.next_window - 1,
            "Window closed"
        );
        emitted
    }

    fn open_window(&mut self) {
        let window = self.next_window;
        self.next_window += 1;

        let next = match self.candles.last().and_then(Candle::last_tick) {
            Some(carry) => Candle::seeded(window, carry.clone()),
            None => Candle::new(window),
        };
        self.candles.push(next);
    }
}
