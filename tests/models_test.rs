//! Wire model tests for quote frames and feed commands.

use candlewick::models::{FeedCommand, SubscriptionAck, Tick, TickBatch};

#[test]
fn test_feed_command_frames() {
    assert_eq!(
        FeedCommand::Subscribe("BTCUSD".to_string()).to_frame(),
        "SUBSCRIBE: BTCUSD"
    );
    assert_eq!(
        FeedCommand::Unsubscribe("BTCUSD".to_string()).to_frame(),
        "UNSUBSCRIBE: BTCUSD"
    );
}

#[test]
fn test_subscription_ack_requires_positive_count() {
    let ack: SubscriptionAck =
        serde_json::from_str(r#"{"subscribed_count":1}"#).expect("Failed to parse ack");
    assert!(ack.is_confirmed());

    let ack: SubscriptionAck =
        serde_json::from_str(r#"{"subscribed_count":0}"#).expect("Failed to parse ack");
    assert!(!ack.is_confirmed());

    let ack: SubscriptionAck = serde_json::from_str("{}").expect("Failed to parse ack");
    assert!(!ack.is_confirmed());
}

#[test]
fn test_tick_batch_deserializes() {
    let json = r#"{
        "ticks": [
            {"s":"BTCUSD","b":"9650.50","a":"9651.00","spr":"0.50","bf":"","af":""},
            {"s":"BTCUSD","b":"9651.00","a":"9652.25","spr":"1.25"}
        ]
    }"#;

    let batch: TickBatch = serde_json::from_str(json).expect("Failed to parse tick batch");
    let ticks = batch.ticks.expect("ticks present");

    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[0].bid, 9650.5);
    assert_eq!(ticks[0].price(), 9651.0);
    assert_eq!(ticks[1].spread, 1.25);
    assert_eq!(ticks[1].high(), 9652.25);
    assert_eq!(ticks[1].low(), 9651.0);
}

#[test]
fn test_tick_batch_without_ticks() {
    let batch: TickBatch =
        serde_json::from_str(r#"{"subscribed_count":1}"#).expect("Failed to parse frame");
    assert!(batch.ticks.is_none());
}

#[test]
fn test_negative_and_non_numeric_prices_are_zeroed() {
    let json = r#"{"s":"BTCUSD","b":"-5","a":"NaN","spr":{"x":1}}"#;
    let tick: Tick = serde_json::from_str(json).expect("Failed to parse tick");

    assert_eq!(tick.bid, 0.0);
    assert_eq!(tick.ask, 0.0);
    assert_eq!(tick.spread, 0.0);
}

#[test]
fn test_tick_new_derives_spread() {
    let tick = Tick::new("BTCUSD", 100.0, 102.5);
    assert_eq!(tick.spread, 2.5);
    assert_eq!(Tick::new("BTCUSD", f32::INFINITY, -1.0).high(), 0.0);
}
