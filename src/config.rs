//! Application configuration loaded from environment variables.
//!
//! Every variable is optional; empty values are treated as absent:
//! - `CANDLEWICK_WEBSOCKET_URL` - quote stream endpoint
//! - `CANDLEWICK_SYMBOL` - instrument to subscribe to
//! - `CANDLEWICK_SOURCE` - `live` (WebSocket) or `mock` (random walk)
//! - `CANDLEWICK_CA_PEM` - PEM bundle of CA roots for the TLS connector
//! - `CANDLEWICK_LOG_FILE` - where tracing output is written
//! - `CANDLEWICK_MAX_CANDLES` - retention cap for closed candles (default 1440)

use std::path::PathBuf;

use crate::CandlewickError;

/// Default quote stream endpoint.
const DEFAULT_WEBSOCKET_URL: &str = "wss://quotes.eccalls.mobi:18400";

/// Default instrument symbol.
const DEFAULT_SYMBOL: &str = "BTCUSD";

/// Default log file, relative to the working directory.
const DEFAULT_LOG_FILE: &str = "candlewick.log";

/// Default retention cap: one day of one-minute candles.
pub const DEFAULT_MAX_CANDLES: usize = 1440;

/// Where ticks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// The live WebSocket quote stream.
    Live,
    /// The offline random-walk generator.
    Mock,
}

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub log_file: PathBuf,
    /// Closed candles kept in memory; older ones are dropped.
    pub max_candles: usize,
}

/// Quote feed configuration values.
#[derive(Debug)]
pub struct FeedConfig {
    pub websocket_url: String,
    pub symbol: String,
    pub source: SourceKind,
    pub ca_pem: Option<PathBuf>,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`CandlewickError::Config`] if `CANDLEWICK_SOURCE` is not one of
/// `live`/`mock`, or if `CANDLEWICK_MAX_CANDLES` is not a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let websocket_url = non_empty_var("CANDLEWICK_WEBSOCKET_URL")
        .unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());
    let symbol =
        non_empty_var("CANDLEWICK_SYMBOL").unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

    let source = match non_empty_var("CANDLEWICK_SOURCE").as_deref() {
        None | Some("live") => SourceKind::Live,
        Some("mock") => SourceKind::Mock,
        Some(other) => {
            return Err(CandlewickError::Config(format!(
                "CANDLEWICK_SOURCE must be `live` or `mock`, got `{other}`"
            )));
        }
    };

    let max_candles = match non_empty_var("CANDLEWICK_MAX_CANDLES") {
        None => DEFAULT_MAX_CANDLES,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(CandlewickError::Config(format!(
                    "CANDLEWICK_MAX_CANDLES must be a positive integer, got `{raw}`"
                )));
            }
        },
    };

    Ok(AppConfig {
        feed: FeedConfig {
            websocket_url,
            symbol,
            source,
            ca_pem: non_empty_var("CANDLEWICK_CA_PEM").map(PathBuf::from),
        },
        log_file: non_empty_var("CANDLEWICK_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        max_candles,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 6] = [
        "CANDLEWICK_WEBSOCKET_URL",
        "CANDLEWICK_SYMBOL",
        "CANDLEWICK_SOURCE",
        "CANDLEWICK_CA_PEM",
        "CANDLEWICK_LOG_FILE",
        "CANDLEWICK_MAX_CANDLES",
    ];

    /// Helper that clears every config variable, applies `vars`, runs `f`,
    /// then restores the originals.
    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let originals: Vec<(&str, Option<String>)> = ALL_VARS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: every test touching these variables holds ENV_LOCK.
        unsafe {
            for k in ALL_VARS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values while still holding ENV_LOCK.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&[], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.feed.websocket_url, DEFAULT_WEBSOCKET_URL);
            assert_eq!(config.feed.symbol, DEFAULT_SYMBOL);
            assert_eq!(config.feed.source, SourceKind::Live);
            assert!(config.feed.ca_pem.is_none());
            assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
            assert_eq!(config.max_candles, DEFAULT_MAX_CANDLES);
        });
    }

    #[test]
    fn overrides_from_env() {
        with_env(
            &[
                ("CANDLEWICK_WEBSOCKET_URL", "wss://custom.example.com"),
                ("CANDLEWICK_SYMBOL", "ETHUSD"),
                ("CANDLEWICK_SOURCE", "mock"),
                ("CANDLEWICK_CA_PEM", "/etc/ssl/ca.pem"),
                ("CANDLEWICK_MAX_CANDLES", "500"),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.feed.websocket_url, "wss://custom.example.com");
                assert_eq!(config.feed.symbol, "ETHUSD");
                assert_eq!(config.feed.source, SourceKind::Mock);
                assert_eq!(config.feed.ca_pem, Some(PathBuf::from("/etc/ssl/ca.pem")));
                assert_eq!(config.max_candles, 500);
            },
        );
    }

    #[test]
    fn rejects_unknown_source() {
        with_env(&[("CANDLEWICK_SOURCE", "replay")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("CANDLEWICK_SOURCE"));
        });
    }

    #[test]
    fn rejects_zero_retention() {
        with_env(&[("CANDLEWICK_MAX_CANDLES", "0")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("positive integer"));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("CANDLEWICK_WEBSOCKET_URL", ""),
                ("CANDLEWICK_SOURCE", ""),
                ("CANDLEWICK_MAX_CANDLES", ""),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.feed.websocket_url, DEFAULT_WEBSOCKET_URL);
                assert_eq!(config.feed.source, SourceKind::Live);
                assert_eq!(config.max_candles, DEFAULT_MAX_CANDLES);
            },
        );
    }
}
