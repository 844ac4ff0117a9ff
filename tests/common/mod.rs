//! Shared test utilities and constants.

#![allow(dead_code)]

use candlewick::models::{Candle, Tick};

/// Symbol used by every fixture.
pub const SYMBOL: &str = "BTCUSD";

/// Public quote stream endpoint.
pub const QUOTE_WS_URL: &str = "wss://quotes.eccalls.mobi:18400";

pub fn tick(bid: f32, ask: f32) -> Tick {
    Tick::new(SYMBOL, bid, ask)
}

/// Candle at `window` built from `(bid, ask)` pairs.
pub fn candle(window: u64, quotes: &[(f32, f32)]) -> Candle {
    Candle::from_ticks(
        window,
        quotes.iter().map(|&(bid, ask)| tick(bid, ask)).collect(),
    )
}

/// `count` identical candles spanning `low..=high`, opening low and closing high.
pub fn flat_series(count: usize, low: f32, high: f32) -> Vec<Candle> {
    (0..count as u64)
        .map(|window| candle(window, &[(low, low), (high, high)]))
        .collect()
}
