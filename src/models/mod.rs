//! Models for the quote stream protocol.
//!
//! Outbound commands are bare text frames (`SUBSCRIBE: BTCUSD`); inbound
//! frames are JSON objects that either acknowledge a subscription or carry
//! a batch of ticks.

pub mod candle;
pub mod tick;

use serde::Deserialize;

pub use candle::Candle;
pub use tick::Tick;

/// Text commands understood by the quote server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCommand {
    Subscribe(String),
    Unsubscribe(String),
}

impl FeedCommand {
    /// Returns the wire-format text frame for this command.
    #[must_use]
    pub fn to_frame(&self) -> String {
        match self {
            FeedCommand::Subscribe(symbol) => format!("SUBSCRIBE: {symbol}"),
            FeedCommand::Unsubscribe(symbol) => format!("UNSUBSCRIBE: {symbol}"),
        }
    }
}

/// Server acknowledgement of a `SUBSCRIBE` command.
#[derive(Debug, Deserialize)]
pub struct SubscriptionAck {
    pub subscribed_count: Option<i64>,
}

impl SubscriptionAck {
    /// The subscription only counts as confirmed with at least one stream.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.subscribed_count.unwrap_or(0) > 0
    }
}

/// A batch of ticks pushed by the server.
#[derive(Debug, Deserialize)]
pub struct TickBatch {
    pub ticks: Option<Vec<Tick>>,
}
