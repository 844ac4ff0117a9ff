//! WebSocket connection lifecycle management.
//!
//! [`ConnectionManager`] connects, subscribes, decodes frames into feed
//! events, and reconnects with exponential backoff whenever the stream
//! drops. The aggregator only ever sees the resulting [`FeedEvent`]s.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tungstenite::Message as WsMessage;

use super::{WsReader, WsWriter, connect, decode_frame, subscribe, unsubscribe};
use crate::source::{FeedEvent, TickSource};
use crate::tui::Message;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Commands sent from the main loop to the connection manager.
#[derive(Debug)]
pub enum ConnectionCommand {
    /// Unsubscribe, close the socket and stop.
    Shutdown,
}

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost or errored.
    ConnectionError,
    /// The app asked to stop, or its message channel closed.
    Shutdown,
}

/// Live quote stream source with automatic reconnection.
pub struct ConnectionManager {
    url: String,
    symbol: String,
    tls_config: Option<Arc<rustls::ClientConfig>>,
    tx: mpsc::UnboundedSender<Message>,
    cmd_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    #[must_use]
    pub fn new(
        url: String,
        symbol: String,
        tls_config: Option<Arc<rustls::ClientConfig>>,
        tx: mpsc::UnboundedSender<Message>,
        cmd_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    ) -> Self {
        Self {
            url,
            symbol,
            tls_config,
            tx,
            cmd_rx,
        }
    }

    /// Forwards a feed event to the main loop; `false` once it has gone away.
    fn emit(&self, event: FeedEvent) -> bool {
        self.tx.send(Message::Feed(event)).is_ok()
    }

    /// Connects and resubscribes until shutdown.
    async fn run_loop(mut self) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            info!(url = %self.url, "Connecting to WebSocket");
            let (mut write, read) = match connect(&self.url, self.tls_config.clone()).await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Connection failed: {e}");
                    if !self.emit(FeedEvent::Disconnected) {
                        return;
                    }
                    info!(backoff_secs = backoff.as_secs(), "Backing off before retry");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            };

            if !self.emit(FeedEvent::Connected) {
                return;
            }

            match subscribe(&mut write, &self.symbol).await {
                Ok(()) => {
                    if !self.emit(FeedEvent::Subscribed) {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Subscribe failed: {e}");
                    if !self.emit(FeedEvent::Disconnected) {
                        return;
                    }
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            }

            // Reset backoff on successful connection
            backoff = INITIAL_BACKOFF;

            match self.read_loop(read).await {
                DisconnectReason::ConnectionError => {
                    if !self.emit(FeedEvent::Disconnected) {
                        return;
                    }
                    info!(
                        backoff_secs = backoff.as_secs(),
                        "Connection lost, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                DisconnectReason::Shutdown => {
                    self.close(write).await;
                    info!("Connection manager shutting down");
                    return;
                }
            }
        }
    }

    /// Reads frames until disconnection or shutdown.
    async fn read_loop(&mut self, mut read: WsReader) -> DisconnectReason {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            for event in decode_frame(&text) {
                                if self.tx.send(Message::Feed(event)).is_err() {
                                    return DisconnectReason::Shutdown;
                                }
                            }
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            warn!(?frame, "Server closed the connection");
                            return DisconnectReason::ConnectionError;
                        }
                        Some(Ok(_)) => {} // Binary/Ping/Pong frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            return DisconnectReason::ConnectionError;
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return DisconnectReason::ConnectionError;
                        }
                    }
                }

                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(ConnectionCommand::Shutdown) | None => {
                            return DisconnectReason::Shutdown;
                        }
                    }
                }
            }
        }
    }

    /// Unsubscribes and closes the socket, logging rather than failing.
    async fn close(&self, mut write: WsWriter) {
        if let Err(e) = unsubscribe(&mut write, &self.symbol).await {
            warn!("Unsubscribe failed: {e}");
        }
        if let Err(e) = write.close().await {
            warn!("Closing WebSocket failed: {e}");
        }
    }
}

impl TickSource for ConnectionManager {
    fn run(self) -> impl Future<Output = ()> + Send {
        self.run_loop()
    }
}
