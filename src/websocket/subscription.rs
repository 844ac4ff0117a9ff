//! Symbol subscribe and unsubscribe commands.

use futures_util::SinkExt;
use tracing::{debug, info};
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::models::FeedCommand;

/// Subscribes to the quote stream for `symbol`.
///
/// A completed write counts as confirmation; the server's acknowledgement
/// frame is handled separately by [`decode_frame`](super::decode_frame).
///
/// # Errors
///
/// Returns a [`CandlewickError`](crate::CandlewickError) if sending the command fails.
pub async fn subscribe(write: &mut WsWriter, symbol: &str) -> Result<()> {
    send_command(write, FeedCommand::Subscribe(symbol.to_string())).await?;
    info!(symbol, "Subscribed to quotes");

    Ok(())
}

/// Unsubscribes from the quote stream for `symbol`.
///
/// # Errors
///
/// Returns a [`CandlewickError`](crate::CandlewickError) if sending the command fails.
pub async fn unsubscribe(write: &mut WsWriter, symbol: &str) -> Result<()> {
    send_command(write, FeedCommand::Unsubscribe(symbol.to_string())).await?;
    info!(symbol, "Unsubscribed from quotes");

    Ok(())
}

async fn send_command(write: &mut WsWriter, command: FeedCommand) -> Result<()> {
    let frame = command.to_frame();
    debug!(frame = %frame, "Sending command");
    write.send(Message::Text(frame.into())).await?;

    Ok(())
}
