//! Window lifecycle tests for the tick-to-candle aggregator.

mod common;

use std::num::NonZeroUsize;

use candlewick::aggregator::{Aggregator, AggregatorState, WindowPolicy};

use common::tick;

/// An armed, timed aggregator with its first window open.
fn armed() -> Aggregator {
    let mut aggregator = Aggregator::new(WindowPolicy::Timed);
    assert!(aggregator.arm());
    let first = aggregator.on_window_tick().expect("armed aggregator emits");
    assert!(first.is_empty());
    aggregator
}

fn ticks_policy(n: usize) -> WindowPolicy {
    WindowPolicy::Ticks(NonZeroUsize::new(n).expect("non-zero"))
}

#[test]
fn test_idle_aggregator_drops_ticks_and_window_ticks() {
    let mut aggregator = Aggregator::new(WindowPolicy::Timed);
    assert_eq!(aggregator.state(), AggregatorState::Idle);

    assert!(aggregator.ingest(tick(100.0, 102.0)).is_none());
    assert!(aggregator.on_window_tick().is_none());
    assert!(aggregator.current().is_none());
}

#[test]
fn test_timed_ticks_before_first_window_are_dropped() {
    let mut aggregator = Aggregator::new(WindowPolicy::Timed);
    aggregator.arm();

    assert!(aggregator.ingest(tick(100.0, 102.0)).is_none());
    assert!(aggregator.candles().is_empty());
}

#[test]
fn test_window_close_emits_ohlc_and_seeds_next() {
    let mut aggregator = armed();
    aggregator.ingest(tick(100.0, 102.0));
    aggregator.ingest(tick(101.0, 103.0));

    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");
    assert_eq!(emitted.len(), 1);
    let candle = &emitted[0];
    assert_eq!(candle.open(), 102.0);
    assert_eq!(candle.close(), 103.0);
    assert_eq!(candle.high(), 103.0);
    assert_eq!(candle.low(), 100.0);

    let next = aggregator.current().expect("next window is open");
    assert!(next.is_seeded());
    assert_eq!(next.ticks(), &[tick(101.0, 103.0)]);
    assert_eq!(next.window(), candle.window() + 1);
}

#[test]
fn test_adjacent_candles_join_up() {
    let mut aggregator = armed();
    aggregator.ingest(tick(100.0, 102.0));
    aggregator.ingest(tick(101.0, 103.0));
    aggregator.on_window_tick();

    aggregator.ingest(tick(95.0, 96.0));
    aggregator.ingest(tick(97.0, 98.0));
    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");

    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[1].open(), emitted[0].close());
    assert_eq!(emitted[1].close(), 98.0);
    assert_eq!(emitted[1].high(), 103.0);
    assert_eq!(emitted[1].low(), 95.0);
    assert!(!emitted[1].is_bullish());
}

#[test]
fn test_empty_first_window_is_not_emitted() {
    let mut aggregator = armed();

    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");
    assert!(emitted.is_empty());

    aggregator.ingest(tick(10.0, 11.0));
    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].open(), 11.0);
}

#[test]
fn test_quiet_window_keeps_carried_tick() {
    let mut aggregator = armed();
    aggregator.ingest(tick(100.0, 102.0));
    aggregator.ingest(tick(101.0, 103.0));
    aggregator.on_window_tick();

    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");
    assert_eq!(emitted.len(), 2);

    let quiet = &emitted[1];
    assert!(quiet.is_seeded());
    assert_eq!(quiet.real_tick_count(), 0);
    assert_eq!(quiet.open(), 103.0);
    assert_eq!(quiet.close(), 103.0);
    assert_eq!(quiet.high(), 103.0);
    assert_eq!(quiet.low(), 101.0);
}

#[test]
fn test_emission_is_oldest_first() {
    let mut aggregator = armed();
    for price in [1.0, 2.0, 3.0] {
        aggregator.ingest(tick(price, price));
        aggregator.on_window_tick();
    }

    aggregator.ingest(tick(4.0, 4.0));
    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");
    let windows: Vec<u64> = emitted.iter().map(|c| c.window()).collect();
    assert_eq!(windows, vec![0, 1, 2, 3]);
    assert_eq!(emitted[3].close(), 4.0);
}

#[test]
fn test_retention_keeps_newest_candles() {
    let mut aggregator = armed().with_retention(3);
    for price in [1.0, 2.0, 3.0, 4.0, 5.0] {
        aggregator.ingest(tick(price, price));
        aggregator.on_window_tick();
    }

    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");
    assert_eq!(emitted.len(), 3);
    assert_eq!(emitted[0].close(), 4.0);
    assert_eq!(emitted[2].close(), 5.0);
    assert!(emitted[2].is_seeded());
}

#[test]
fn test_one_tick_per_bar() {
    let mut aggregator = Aggregator::new(ticks_policy(1));
    aggregator.arm();

    let emitted = aggregator
        .ingest(tick(1.0, 2.0))
        .expect("each tick closes its window");
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].open(), 2.0);

    let emitted = aggregator
        .ingest(tick(3.0, 4.0))
        .expect("each tick closes its window");
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[1].open(), 2.0);
    assert_eq!(emitted[1].close(), 4.0);
    assert!(emitted[1].is_bullish());
}

#[test]
fn test_tick_count_window_waits_for_real_ticks() {
    let mut aggregator = Aggregator::new(ticks_policy(3));
    aggregator.arm();

    assert!(aggregator.ingest(tick(1.0, 1.0)).is_none());
    assert!(aggregator.ingest(tick(2.0, 2.0)).is_none());
    assert!(aggregator.ingest(tick(3.0, 3.0)).is_some());

    // The carried tick does not count toward the next window.
    assert!(aggregator.ingest(tick(4.0, 4.0)).is_none());
    assert!(aggregator.ingest(tick(5.0, 5.0)).is_none());
    let emitted = aggregator.ingest(tick(6.0, 6.0)).expect("third real tick");
    assert_eq!(emitted[1].len(), 4);
    assert_eq!(emitted[1].open(), 3.0);
}

#[test]
fn test_ingest_all_returns_last_emission() {
    let mut aggregator = Aggregator::new(ticks_policy(2));
    aggregator.arm();

    let batch = (1..=5).map(|i| tick(i as f32, i as f32));
    let emitted = aggregator.ingest_all(batch).expect("two windows closed");
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[1].close(), 4.0);

    let current = aggregator.current().expect("open window");
    assert_eq!(current.close(), 5.0);
    assert_eq!(current.real_tick_count(), 1);
}

#[test]
fn test_timed_ingest_never_emits() {
    let mut aggregator = armed();
    let batch = (1..=100).map(|i| tick(i as f32, i as f32));
    assert!(aggregator.ingest_all(batch).is_none());
    assert_eq!(aggregator.current().map(|c| c.len()), Some(100));
}

#[test]
fn test_emission_shares_closed_ticks() {
    let mut aggregator = armed();
    aggregator.ingest(tick(100.0, 102.0));
    let emitted = aggregator.on_window_tick().expect("armed aggregator emits");

    let retained = &aggregator.candles()[0];
    assert!(std::ptr::eq(
        emitted[0].ticks().as_ptr(),
        retained.ticks().as_ptr()
    ));
}
