//! Bid/ask quote records.

use serde::{Deserialize, Deserializer, Serialize};

/// A single bid/ask observation for the instrument.
///
/// Upstream sends every value as a string; [`lenient_price`] turns blank,
/// unparseable, non-finite or negative values into `0.0` instead of
/// rejecting the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    #[serde(rename = "s", default)]
    pub symbol: String,
    #[serde(rename = "b", default, deserialize_with = "lenient_price")]
    pub bid: f32,
    #[serde(rename = "a", default, deserialize_with = "lenient_price")]
    pub ask: f32,
    #[serde(rename = "spr", default, deserialize_with = "lenient_price")]
    pub spread: f32,
    /// Legacy display field for the bid, passed through untouched.
    #[serde(rename = "bf", default, deserialize_with = "lenient_text")]
    pub bid_display: String,
    /// Legacy display field for the ask, passed through untouched.
    #[serde(rename = "af", default, deserialize_with = "lenient_text")]
    pub ask_display: String,
}

impl Tick {
    /// Builds a tick from already-parsed prices.
    #[must_use]
    pub fn new(symbol: impl Into<String>, bid: f32, ask: f32) -> Self {
        let bid = sanitize(bid);
        let ask = sanitize(ask);
        Self {
            symbol: symbol.into(),
            bid,
            ask,
            spread: (ask - bid).abs(),
            bid_display: String::new(),
            ask_display: String::new(),
        }
    }

    /// The price candles open and close on (the ask).
    #[must_use]
    pub fn price(&self) -> f32 {
        self.ask
    }

    #[must_use]
    pub fn high(&self) -> f32 {
        self.bid.max(self.ask)
    }

    #[must_use]
    pub fn low(&self) -> f32 {
        self.bid.min(self.ask)
    }
}

/// Clamps a price to the non-negative finite range, `0.0` otherwise.
fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Any JSON shape a quote field has been seen in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Number(f64),
    Other(serde_json::Value),
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawField::deserialize(deserializer)? {
        RawField::Text(s) => s.trim().parse::<f32>().unwrap_or(0.0),
        RawField::Number(n) => n as f32,
        RawField::Other(_) => 0.0,
    };
    Ok(sanitize(value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawField::deserialize(deserializer)? {
        RawField::Text(s) => s,
        RawField::Number(n) => n.to_string(),
        RawField::Other(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_prices() {
        let json = r#"{"s":"BTCUSD","b":"9650.5","a":"9651.25","spr":"0.75","bf":"50","af":"51"}"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.symbol, "BTCUSD");
        assert_eq!(tick.bid, 9650.5);
        assert_eq!(tick.ask, 9651.25);
        assert_eq!(tick.spread, 0.75);
        assert_eq!(tick.bid_display, "50");
        assert_eq!(tick.ask_display, "51");
    }

    #[test]
    fn blank_and_garbage_fields_become_zero() {
        let json = r#"{"s":"BTCUSD","b":"","a":"n/a","spr":null}"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.bid, 0.0);
        assert_eq!(tick.ask, 0.0);
        assert_eq!(tick.spread, 0.0);
        assert!(tick.bid_display.is_empty());
    }

    #[test]
    fn numeric_and_missing_fields_are_accepted() {
        let json = r#"{"s":"BTCUSD","b":100,"a":102.5}"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.bid, 100.0);
        assert_eq!(tick.ask, 102.5);
        assert_eq!(tick.spread, 0.0);
    }

    #[test]
    fn negative_and_non_finite_prices_become_zero() {
        let json = r#"{"s":"BTCUSD","b":"-5","a":"inf"}"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.bid, 0.0);
        assert_eq!(tick.ask, 0.0);
        assert_eq!(Tick::new("X", f32::NAN, -1.0).high(), 0.0);
    }

    #[test]
    fn high_low_and_price() {
        let tick = Tick::new("BTCUSD", 101.0, 103.0);
        assert_eq!(tick.high(), 103.0);
        assert_eq!(tick.low(), 101.0);
        assert_eq!(tick.price(), 103.0);

        let crossed = Tick::new("BTCUSD", 105.0, 104.0);
        assert_eq!(crossed.high(), 105.0);
        assert_eq!(crossed.low(), 104.0);
    }
}
