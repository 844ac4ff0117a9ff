//! Tick sources feeding the aggregator.
//!
//! A source runs as its own task and reports [`FeedEvent`]s to the main
//! loop. The live WebSocket feed ([`ConnectionManager`]) and the offline
//! [`RandomWalk`] generator implement the same [`TickSource`] trait, so the
//! rest of the application cannot tell them apart.
//!
//! [`ConnectionManager`]: crate::websocket::ConnectionManager

use std::future::Future;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::Tick;
use crate::tui::Message;

/// Default pause between random-walk batches.
const MOCK_INTERVAL: Duration = Duration::from_millis(500);

/// Ticks per random-walk batch.
const MOCK_BATCH_SIZE: usize = 10;

/// Largest step between consecutive random-walk prices.
const MOCK_MAX_STEP: f32 = 100.0;

/// Transport-level events delivered to the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The transport is up; the subscribe handshake follows.
    Connected,
    /// The subscription was confirmed; windows may start.
    Subscribed,
    /// A batch of decoded ticks, in arrival order.
    Ticks(Vec<Tick>),
    /// The transport dropped; it reconnects on its own.
    Disconnected,
}

/// Anything that can drive the chart with ticks.
pub trait TickSource: Send + 'static {
    /// Runs until the receiving side of the message channel is dropped.
    fn run(self) -> impl Future<Output = ()> + Send;
}

/// Offline source producing a random walk of quotes.
pub struct RandomWalk {
    symbol: String,
    interval: Duration,
    rng: StdRng,
    last_price: Option<f32>,
    tx: mpsc::UnboundedSender<Message>,
}

impl RandomWalk {
    /// Creates a generator seeded from system entropy.
    #[must_use]
    pub fn new(symbol: impl Into<String>, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: MOCK_INTERVAL,
            rng: StdRng::from_entropy(),
            last_price: None,
            tx,
        }
    }

    /// Makes the walk reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Produces the next batch of ticks, continuing from the previous one.
    pub fn next_batch(&mut self) -> Vec<Tick> {
        let mut ticks = Vec::with_capacity(MOCK_BATCH_SIZE);
        for _ in 0..MOCK_BATCH_SIZE {
            let ask = match self.last_price {
                Some(previous) => {
                    let step = self.rng.gen_range(-MOCK_MAX_STEP..=MOCK_MAX_STEP).round();
                    (previous + step).max(0.0)
                }
                None => self.rng.gen_range(1000_u32..5000) as f32,
            };
            let spread = self.rng.gen_range(0.5..5.0_f32);
            self.last_price = Some(ask);
            ticks.push(Tick::new(self.symbol.clone(), (ask - spread).max(0.0), ask));
        }
        ticks
    }
}

impl TickSource for RandomWalk {
    fn run(mut self) -> impl Future<Output = ()> + Send {
        async move {
            info!(symbol = %self.symbol, "Starting random-walk tick source");
            for event in [FeedEvent::Connected, FeedEvent::Subscribed] {
                if self.tx.send(Message::Feed(event)).is_err() {
                    return;
                }
            }

            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                let batch = self.next_batch();
                debug!(ticks = batch.len(), "Generated mock ticks");
                if self.tx.send(Message::Feed(FeedEvent::Ticks(batch))).is_err() {
                    info!("Message channel closed, stopping random-walk source");
                    return;
                }
            }
        }
    }
}
