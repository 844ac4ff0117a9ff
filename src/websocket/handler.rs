//! Incoming frame decoding.

use tracing::{debug, warn};

use crate::models::{SubscriptionAck, TickBatch};
use crate::source::FeedEvent;

/// Decodes one text frame into the feed events it carries.
///
/// A frame may confirm the subscription, carry ticks, both, or neither.
/// Frames that are not JSON are logged and produce no events.
#[must_use]
pub fn decode_frame(text: &str) -> Vec<FeedEvent> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed frame");
            return Vec::new();
        }
    };

    let mut events = Vec::new();

    if value.get("subscribed_count").is_some() {
        match serde_json::from_value::<SubscriptionAck>(value.clone()) {
            Ok(ack) if ack.is_confirmed() => {
                debug!(count = ?ack.subscribed_count, "Subscription acknowledged");
                events.push(FeedEvent::Subscribed);
            }
            Ok(ack) => debug!(count = ?ack.subscribed_count, "Empty subscription acknowledgement"),
            Err(e) => warn!(error = %e, "Unreadable subscription acknowledgement"),
        }
    }

    if value.get("ticks").is_some() {
        match serde_json::from_value::<TickBatch>(value) {
            Ok(TickBatch {
                ticks: Some(ticks),
            }) if !ticks.is_empty() => events.push(FeedEvent::Ticks(ticks)),
            Ok(_) => debug!("Empty tick batch"),
            Err(e) => warn!(error = %e, "Unreadable tick batch"),
        }
    } else if events.is_empty() {
        debug!("Ignoring frame without ticks");
    }

    events
}
