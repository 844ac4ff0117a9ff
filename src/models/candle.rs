//! OHLC accumulator over one aggregation window.

use std::sync::Arc;

use super::tick::Tick;

/// The ticks of one window, in arrival order.
///
/// OHLC values are derived on demand. A candle without ticks reports
/// `open = close = high = 0` and `low = +inf`; such candles are never
/// handed to the chart.
///
/// Clones share the tick list. Only the open candle is ever pushed to, and
/// it is not shared, so emitting history never copies ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    window: u64,
    ticks: Arc<Vec<Tick>>,
    seeded: bool,
}

impl Candle {
    /// Creates an empty candle for the given window sequence number.
    #[must_use]
    pub fn new(window: u64) -> Self {
        Self {
            window,
            ticks: Arc::default(),
            seeded: false,
        }
    }

    /// Creates a candle whose first tick is carried over from the
    /// previous window's close.
    #[must_use]
    pub fn seeded(window: u64, carry: Tick) -> Self {
        Self {
            window,
            ticks: Arc::new(vec![carry]),
            seeded: true,
        }
    }

    /// Builds a closed candle from a known tick sequence.
    #[must_use]
    pub fn from_ticks(window: u64, ticks: Vec<Tick>) -> Self {
        Self {
            window,
            ticks: Arc::new(ticks),
            seeded: false,
        }
    }

    pub fn push(&mut self, tick: Tick) {
        Arc::make_mut(&mut self.ticks).push(tick);
    }

    /// Sequence number of the window this candle covers.
    #[must_use]
    pub fn window(&self) -> u64 {
        self.window
    }

    #[must_use]
    pub fn ticks(&self) -> &[Tick] {
        self.ticks.as_slice()
    }

    #[must_use]
    pub fn last_tick(&self) -> Option<&Tick> {
        self.ticks.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Whether the first tick is a carry-over from the previous window.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Number of ticks that actually arrived during this window.
    #[must_use]
    pub fn real_tick_count(&self) -> usize {
        self.ticks.len() - usize::from(self.seeded)
    }

    #[must_use]
    pub fn open(&self) -> f32 {
        self.ticks.first().map_or(0.0, Tick::price)
    }

    #[must_use]
    pub fn close(&self) -> f32 {
        self.ticks.last().map_or(0.0, Tick::price)
    }

    #[must_use]
    pub fn high(&self) -> f32 {
        self.ticks.iter().map(Tick::high).reduce(f32::max).unwrap_or(0.0)
    }

    #[must_use]
    pub fn low(&self) -> f32 {
        self.ticks
            .iter()
            .map(Tick::low)
            .reduce(f32::min)
            .unwrap_or(f32::INFINITY)
    }

    /// `true` when the candle closed above its open.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }
}
