//! Async WebSocket client for the quote stream.
//!
//! This module is organized by domain:
//! - [`subscription`] - `SUBSCRIBE`/`UNSUBSCRIBE` commands
//! - [`handler`] - Incoming frame decoding
//! - [`connection`] - Connection lifecycle and reconnection

mod connection;
mod handler;
mod subscription;

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config};
use tracing::info;
use tungstenite::Message;

use crate::Result;

pub use connection::{ConnectionCommand, ConnectionManager};
pub use handler::decode_frame;
pub use subscription::{subscribe, unsubscribe};

/// Write half of a quote stream connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a quote stream connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// With `tls` set, the TLS handshake trusts only that configuration's
/// roots; otherwise the bundled webpki roots are used.
///
/// # Errors
///
/// Returns a [`CandlewickError`](crate::CandlewickError) if the connection or TLS handshake fails.
pub async fn connect(
    url: &str,
    tls: Option<Arc<rustls::ClientConfig>>,
) -> Result<(WsWriter, WsReader)> {
    let connector = tls.map(Connector::Rustls);
    let (ws_stream, _) = connect_async_tls_with_config(url, None, false, connector).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}
