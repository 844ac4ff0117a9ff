//! Crate-level error types.
//!
//! [`CandlewickError`] unifies the fallible edges of the crate (configuration,
//! WebSocket, JSON, terminal and TLS setup) behind a single enum. Aggregation
//! and projection never fail and therefore never produce one.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CandlewickError>;

/// Top-level error type returned by all fallible public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CandlewickError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// The TLS client configuration could not be built.
    #[error("tls error: {0}")]
    Tls(String),
}
